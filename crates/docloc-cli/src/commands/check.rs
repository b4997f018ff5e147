use docloc_domain::LocaleCheck;
use docloc_services::Project;
use owo_colors::OwoColorize;

pub fn run_check(project: &Project, format: &str, use_color: bool) -> color_eyre::Result<bool> {
    tracing::debug!(event = "check_args", root = ?project.root, format = %format);

    let reports = docloc_services::check(project)?;
    if format == "json" {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &reports)?;
        println!();
    } else {
        for r in &reports {
            print_report(r, use_color);
        }
    }
    Ok(reports.iter().all(|r| r.ok))
}

fn print_report(r: &LocaleCheck, use_color: bool) {
    if let Some(err) = &r.error {
        crate::ui_err!("{}: {}", r.locale, err);
        return;
    }
    let tag = match (r.ok, use_color) {
        (true, false) => "[OK]".to_string(),
        (true, true) => "[OK]".green().to_string(),
        (false, false) => "[ERRORS]".to_string(),
        (false, true) => "[ERRORS]".red().to_string(),
    };
    crate::ui_out!("{tag} {}", r.locale);
    for entry in &r.entries {
        let line = entry.po_line.map(|l| l.to_string()).unwrap_or_default();
        crate::ui_out!("  - #{} - {}", line, entry.msgid);
        for finding in &entry.findings {
            crate::ui_out!("    - {finding}");
        }
    }
}
