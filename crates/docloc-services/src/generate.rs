use crate::project::Project;
use docloc_core::{Catalog, DocLocError, Entry, Result};
use docloc_domain::{LocaleCompletion, SCHEMA_VERSION};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Locale entries counted as translated: the identity is in the template, the
/// entry is not fuzzy and every translated form is non-blank.
pub fn count_translated(template: &Catalog, locale: &Catalog) -> usize {
    locale
        .iter()
        .filter(|e| template.contains(&e.id))
        .filter(|e| !e.fuzzy && !e.translation.is_blank())
        .filter(|e| template.get(&e.id).map(|t| t.translation != e.translation).unwrap_or(false))
        .count()
}

/// Share of the template that `locale` translates, 0.0 for an empty template.
pub fn completion(template: &Catalog, locale: &Catalog) -> f64 {
    if template.is_empty() {
        return 0.0;
    }
    count_translated(template, locale) as f64 / template.len() as f64
}

/// Fraction rounded to two decimals, compared inclusively with `cutoff`.
pub fn passes_gate(fraction: f64, cutoff: f64) -> bool {
    (fraction * 100.0).round() / 100.0 >= cutoff
}

pub fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}

/// Text emitted for an entry: its translation when usable, else the source.
pub fn display_text(entry: &Entry) -> &str {
    if !entry.fuzzy && !entry.translation.is_blank() {
        entry.translation.first()
    } else {
        &entry.id.id
    }
}

/// One regenerated document, keyed by the source location file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub file: String,
    pub content: String,
}

/// Rebuild every document referenced by the catalog's locations. Blocks are
/// ordered by line; blocks on the same line keep catalog order. An entry with
/// several locations in one file is emitted once per location.
pub fn regenerate(catalog: &Catalog) -> Vec<GeneratedDocument> {
    let mut files: BTreeMap<&str, Vec<(usize, &str)>> = BTreeMap::new();
    for entry in catalog.iter().filter(|e| !e.is_obsolete()) {
        let text = display_text(entry);
        for loc in &entry.locations {
            files.entry(loc.file.as_str()).or_default().push((loc.line, text));
        }
    }
    files
        .into_iter()
        .map(|(file, mut blocks)| {
            blocks.sort_by_key(|(line, _)| *line);
            let mut content = String::new();
            for (_, text) in blocks {
                content.push_str(text);
                content.push_str("\n\n");
            }
            GeneratedDocument {
                file: file.to_string(),
                content,
            }
        })
        .collect()
}

/// Output directory name for a locale identifier (`pt_BR` -> `pt-BR`).
pub fn locale_dir_name(locale: &str) -> String {
    locale.replace('_', "-")
}

/// Location file relative to the locale output directory: the leading
/// source-locale component is dropped and subdirectories are kept, so
/// `guide/index.md` and `index.md` never overwrite each other. Paths escaping
/// the directory yield None.
fn output_rel_path(file: &str, source_locale: &str) -> Option<PathBuf> {
    let prefix = format!("{source_locale}/");
    let rel = Path::new(file.strip_prefix(&prefix).unwrap_or(file));
    if rel.as_os_str().is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(rel.to_path_buf())
}

/// Write regenerated documents under `dest`. Returns the number of files written.
pub fn write_documents(dest: &Path, docs: &[GeneratedDocument], source_locale: &str) -> Result<usize> {
    let mut written = 0;
    for doc in docs {
        let Some(rel) = output_rel_path(&doc.file, source_locale) else {
            tracing::warn!(event = "generate_skip_path", file = %doc.file);
            continue;
        };
        let path = dest.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocLocError::io(parent, e))?;
        }
        let mut fp = std::fs::File::create(&path).map_err(|e| DocLocError::io(&path, e))?;
        fp.write_all(doc.content.as_bytes())
            .map_err(|e| DocLocError::io(&path, e))?;
        written += 1;
    }
    Ok(written)
}

/// Compute completion for every locale catalog and regenerate the documents
/// of locales passing `cutoff`.
pub fn generate(project: &Project, cutoff: f64) -> Result<Vec<LocaleCompletion>> {
    let template = project.load_template()?;
    let mut out = Vec::new();
    for (code, path) in project.locale_catalogs(&project.generate_skip)? {
        match generate_locale(project, &template, &code, &path, cutoff) {
            Ok(report) => out.push(report),
            Err(err) => {
                tracing::error!(event = "generate_locale_failed", locale = %code, path = %path.display(), error = %err);
                out.push(LocaleCompletion {
                    schema_version: SCHEMA_VERSION,
                    locale: code,
                    translated: 0,
                    total: template.len(),
                    percent: 0,
                    included: false,
                    destination: None,
                    files: 0,
                    error: Some(format!("{err:#}")),
                });
            }
        }
    }
    Ok(out)
}

fn generate_locale(
    project: &Project,
    template: &Catalog,
    code: &str,
    path: &Path,
    cutoff: f64,
) -> Result<LocaleCompletion> {
    let catalog = docloc_import_po::read_po(path, None)?;
    let translated = count_translated(template, &catalog);
    let fraction = completion(template, &catalog);
    let mut report = LocaleCompletion {
        schema_version: SCHEMA_VERSION,
        locale: code.to_string(),
        translated,
        total: template.len(),
        percent: percent(fraction),
        included: passes_gate(fraction, cutoff),
        destination: None,
        files: 0,
        error: None,
    };
    if !report.included {
        tracing::info!(event = "generate_locale_skipped", locale = %code, percent = report.percent);
        return Ok(report);
    }

    let dir_name = locale_dir_name(catalog.locale.as_deref().unwrap_or(code));
    let dest = project.output_dir.join(dir_name);
    let docs = regenerate(&catalog);
    report.files = write_documents(&dest, &docs, &project.source_locale)?;
    report.destination = Some(project.display_path(&dest));
    tracing::info!(event = "generate_locale", locale = %code, dest = %dest.display(), files = report.files);
    Ok(report)
}
