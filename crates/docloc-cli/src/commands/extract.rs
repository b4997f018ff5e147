use docloc_services::Project;

pub fn run_extract(project: &Project) -> color_eyre::Result<bool> {
    tracing::debug!(event = "extract_args", root = ?project.root, source_locale = %project.source_locale, extension = %project.extension);

    let summary = docloc_services::extract(project)?;
    crate::ui_info!(
        "{} messages ({} locations) from {} files",
        summary.messages,
        summary.locations,
        summary.files
    );
    crate::ui_out!("{} written", summary.template);
    Ok(true)
}
