use crate::header::{self, CatalogOptions};
use crate::project::Project;
use docloc_core::{Catalog, Entry, Result, Translation};
use docloc_domain::{LocaleUpdate, SCHEMA_VERSION};
use docloc_export_po::{write_po_file, WriteOptions};
use std::path::Path;

/// What a sync did to a locale catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Entries whose identity already existed in the locale catalog.
    pub carried: usize,
    pub added: usize,
    /// Locale entries with no counterpart in the template.
    pub dropped: usize,
}

/// Bring a locale catalog in line with the template. See [`sync_with_stats`].
pub fn sync(
    template: &Catalog,
    existing: Option<&Catalog>,
    locale: &str,
    options: &CatalogOptions,
) -> Catalog {
    sync_with_stats(template, existing, locale, options).0
}

/// Entries follow the template: its identities, order, locations, auto
/// comments and flags. Translations, the fuzzy marker and translator comments
/// are carried over from `existing` by exact identity. Identities missing from
/// the template are dropped.
pub fn sync_with_stats(
    template: &Catalog,
    existing: Option<&Catalog>,
    locale: &str,
    options: &CatalogOptions,
) -> (Catalog, SyncStats) {
    let mut out = match existing {
        Some(old) => {
            let mut c = Catalog::new(Some(locale.to_string()), old.domain.clone());
            c.header_comment = old.header_comment.clone();
            c.metadata = old.metadata.clone();
            c.fuzzy_header = old.fuzzy_header;
            if c.header("Language").is_none() {
                c.set_header("Language", locale);
            }
            c
        }
        None => {
            let (stamp, year) = header::po_timestamp();
            let date = template.header("POT-Creation-Date").unwrap_or(stamp.as_str());
            header::locale_catalog(options, locale, date, year)
        }
    };
    if let Some(date) = template.header("POT-Creation-Date") {
        out.set_header("POT-Creation-Date", date);
    }

    let nplurals = out.num_plurals();
    let mut stats = SyncStats::default();
    for t in template.iter() {
        let mut entry = Entry::new(t.id.clone());
        entry.id_plural = t.id_plural.clone();
        entry.locations = t.locations.clone();
        entry.auto_comments = t.auto_comments.clone();
        entry.flags = t.flags.clone();

        match existing.and_then(|old| old.get(&t.id)) {
            Some(old) => {
                let (translation, reshaped) =
                    reshape(&old.translation, t.id_plural.is_some(), nplurals);
                entry.fuzzy = old.fuzzy || (reshaped && !old.translation.is_blank());
                entry.translation = translation;
                entry.user_comments = old.user_comments.clone();
                stats.carried += 1;
            }
            None => {
                if t.id_plural.is_some() {
                    entry.translation = Translation::Plural(vec![String::new(); nplurals]);
                }
                stats.added += 1;
            }
        }
        out.insert(entry);
    }

    stats.dropped = existing
        .map(|old| old.iter().filter(|e| !template.contains(&e.id)).count())
        .unwrap_or(0);
    (out, stats)
}

/// Convert a stored translation to the shape the template now expects.
/// Returns whether the shape changed.
fn reshape(old: &Translation, plural: bool, nplurals: usize) -> (Translation, bool) {
    match (old, plural) {
        (Translation::Singular(s), true) => {
            let mut forms = vec![s.clone()];
            forms.resize(nplurals.max(1), String::new());
            (Translation::Plural(forms), true)
        }
        (Translation::Plural(forms), false) => (
            Translation::Singular(forms.first().cloned().unwrap_or_default()),
            true,
        ),
        (t, _) => (t.clone(), false),
    }
}

/// Sync every locale directory under the translations directory with the
/// template. A locale that fails is reported and the others continue.
pub fn update(project: &Project) -> Result<Vec<LocaleUpdate>> {
    let template = project.load_template()?;
    let mut out = Vec::new();
    for code in project.locale_dirs()? {
        let path = project.catalog_path(&code);
        match update_locale(project, &template, &code, &path) {
            Ok(report) => out.push(report),
            Err(err) => {
                tracing::error!(event = "update_locale_failed", locale = %code, path = %path.display(), error = %err);
                out.push(LocaleUpdate {
                    schema_version: SCHEMA_VERSION,
                    locale: code,
                    path: project.display_path(&path),
                    status: "failed".into(),
                    entries: 0,
                    carried: 0,
                    added: 0,
                    dropped: 0,
                    error: Some(format!("{err:#}")),
                });
            }
        }
    }
    Ok(out)
}

fn update_locale(
    project: &Project,
    template: &Catalog,
    code: &str,
    path: &Path,
) -> Result<LocaleUpdate> {
    let existing = if path.is_file() {
        Some(docloc_import_po::read_po(path, Some(code))?)
    } else {
        None
    };
    let status = if existing.is_some() { "updated" } else { "created" };
    let (catalog, stats) = sync_with_stats(template, existing.as_ref(), code, &project.catalog);
    write_po_file(path, &catalog, &WriteOptions { sort_by_file: false })?;
    tracing::info!(
        event = "update_locale",
        locale = %code,
        status = status,
        carried = stats.carried,
        added = stats.added,
        dropped = stats.dropped
    );
    Ok(LocaleUpdate {
        schema_version: SCHEMA_VERSION,
        locale: code.to_string(),
        path: project.display_path(path),
        status: status.into(),
        entries: catalog.len(),
        carried: stats.carried,
        added: stats.added,
        dropped: stats.dropped,
        error: None,
    })
}
