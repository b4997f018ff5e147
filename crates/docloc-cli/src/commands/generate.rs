use color_eyre::eyre::bail;
use docloc_domain::LocaleCompletion;
use docloc_services::Project;
use owo_colors::OwoColorize;

pub fn run_generate(
    project: &Project,
    cutoff: Option<f64>,
    format: &str,
    use_color: bool,
) -> color_eyre::Result<bool> {
    let cutoff = cutoff.unwrap_or(project.cutoff);
    tracing::debug!(event = "generate_args", root = ?project.root, cutoff = cutoff, format = %format);
    if !(0.0..=1.0).contains(&cutoff) {
        bail!("cutoff must be between 0 and 1, got {cutoff}");
    }

    let reports = docloc_services::generate(project, cutoff)?;
    if format == "json" {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &reports)?;
        println!();
    } else {
        for r in &reports {
            match &r.error {
                Some(err) => crate::ui_err!("{}: {}", r.locale, err),
                None => crate::ui_out!("{}", status_line(r, use_color)),
            }
        }
    }
    Ok(reports.iter().all(|r| r.error.is_none()))
}

fn status_line(r: &LocaleCompletion, use_color: bool) -> String {
    let counts = format!("{:>4}/{:<4} {:>4}%", r.translated, r.total, r.percent);
    let tag = if r.included { "[+]" } else { "[-]" };
    let tag = match (use_color, r.included) {
        (false, _) => tag.to_string(),
        (true, true) => tag.green().to_string(),
        (true, false) => tag.yellow().to_string(),
    };
    match &r.destination {
        Some(dest) => format!("{tag} {:8} {counts} -- {dest}/", r.locale),
        None => format!("{tag} {:8} {counts}", r.locale),
    }
}
