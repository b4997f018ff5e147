use docloc_services::Project;

pub fn run_update(project: &Project) -> color_eyre::Result<bool> {
    tracing::debug!(event = "update_args", root = ?project.root, translations = ?project.translations_dir);

    let reports = docloc_services::update(project)?;
    if reports.is_empty() {
        crate::ui_warn!(
            "no locale directories under {}",
            project.display_path(&project.translations_dir)
        );
    }
    let mut ok = true;
    for r in &reports {
        match &r.error {
            None => crate::ui_out!("{} written", r.path),
            Some(err) => {
                ok = false;
                crate::ui_err!("{} ({}): {}", r.locale, r.path, err);
            }
        }
    }
    Ok(ok)
}
