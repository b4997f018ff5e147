use crate::project::Project;
use docloc_core::{Catalog, Result};
use docloc_domain::{CheckEntry, LocaleCheck, SCHEMA_VERSION};
use docloc_validate::{default_checkers, validate, Checker};

/// Run `checkers` over one catalog and flatten the findings for reporting.
pub fn check_catalog(catalog: &Catalog, checkers: &[Box<dyn Checker>]) -> Vec<CheckEntry> {
    validate(catalog, checkers)
        .into_iter()
        .map(|f| CheckEntry {
            po_line: f.po_line,
            msgid: f.id.id,
            msgctxt: f.id.context,
            findings: f.findings.iter().map(ToString::to_string).collect(),
        })
        .collect()
}

/// Validate every locale catalog. Catalogs that cannot be read are reported
/// as failed and do not stop the others.
pub fn check(project: &Project) -> Result<Vec<LocaleCheck>> {
    let checkers = default_checkers();
    let mut out = Vec::new();
    for (code, path) in project.locale_catalogs(&project.check_skip)? {
        let report = match docloc_import_po::read_po(&path, None) {
            Ok(catalog) => {
                let entries = check_catalog(&catalog, &checkers);
                tracing::info!(event = "check_locale", locale = %code, entries_with_errors = entries.len());
                LocaleCheck {
                    schema_version: SCHEMA_VERSION,
                    locale: code,
                    ok: entries.is_empty(),
                    entries,
                    error: None,
                }
            }
            Err(err) => {
                tracing::error!(event = "check_locale_failed", locale = %code, path = %path.display(), error = %err);
                LocaleCheck {
                    schema_version: SCHEMA_VERSION,
                    locale: code,
                    ok: false,
                    entries: Vec::new(),
                    error: Some(format!("{err:#}")),
                }
            }
        };
        out.push(report);
    }
    Ok(out)
}
