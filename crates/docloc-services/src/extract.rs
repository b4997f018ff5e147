use crate::header::{self, CatalogOptions};
use crate::project::Project;
use docloc_core::{Catalog, Location, MessageId, Result};
use docloc_domain::{ExtractSummary, SCHEMA_VERSION};
use docloc_export_po::{write_po_file, WriteOptions};
use docloc_parsers_text::{discover_documents, scan_document};
use std::path::Path;

/// Build the template catalog from every document under
/// `source_root/source_dir`. Returns the catalog and the number of files read.
pub fn extract_catalog(
    source_root: &Path,
    source_dir: &str,
    extension: &str,
    options: &CatalogOptions,
) -> Result<(Catalog, usize)> {
    let (stamp, year) = header::po_timestamp();
    let mut catalog = header::template_catalog(options, &stamp, year);

    let docs = discover_documents(source_root, source_dir, extension)?;
    for doc in &docs {
        for block in scan_document(doc)? {
            let python_format = docloc_validate::has_printf_placeholders(&block.text);
            let entry = catalog.add(
                MessageId::new(block.text),
                Location::new(doc.rel_path.clone(), block.start_line),
            );
            if python_format {
                entry.flags.insert("python-format".into());
            }
        }
        tracing::debug!(event = "document_extracted", file = %doc.rel_path);
    }
    Ok((catalog, docs.len()))
}

/// Rebuild the template from the source-locale documents and write it.
pub fn extract(project: &Project) -> Result<ExtractSummary> {
    let (catalog, files) = extract_catalog(
        &project.source_root(),
        &project.source_locale,
        &project.extension,
        &project.catalog,
    )?;
    let path = project.template_path();
    write_po_file(&path, &catalog, &WriteOptions::default())?;

    let locations: usize = catalog.iter().map(|e| e.locations.len()).sum();
    tracing::info!(
        event = "template_written",
        path = %path.display(),
        files = files,
        messages = catalog.len(),
        locations = locations
    );
    Ok(ExtractSummary {
        schema_version: SCHEMA_VERSION,
        template: project.display_path(&path),
        files,
        messages: catalog.len(),
        locations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn docs_tree() -> (tempfile::TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src/en-US/guide");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            dir.path().join("src/en-US/index.md"),
            "# Welcome\n\nShared note\n",
        )
        .unwrap();
        fs::write(
            src.join("usage.md"),
            "# Usage\n\nShared note\n\nSaved %(count)d bookmarks\n",
        )
        .unwrap();
        fs::write(src.join("ignored.txt"), "not a doc\n").unwrap();
        let project = Project::new(dir.path());
        (dir, project)
    }

    #[test]
    fn repeated_blocks_become_one_entry_with_all_locations() {
        let (_dir, project) = docs_tree();
        let (cat, files) = extract_catalog(
            &project.source_root(),
            "en-US",
            "md",
            &CatalogOptions::default(),
        )
        .unwrap();
        assert_eq!(files, 2);
        assert_eq!(cat.len(), 4);
        let shared = cat.get(&MessageId::new("Shared note")).unwrap();
        assert_eq!(
            shared.locations,
            vec![
                Location::new("en-US/guide/usage.md", 3),
                Location::new("en-US/index.md", 3),
            ]
        );
        assert!(shared.translation.is_blank());
    }

    #[test]
    fn block_repeated_in_one_file_keeps_both_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/en-US")).unwrap();
        fs::write(dir.path().join("src/en-US/a.md"), "Note\n\nOther\n\nNote\n").unwrap();
        let project = Project::new(dir.path());

        let (cat, _) = extract_catalog(&project.source_root(), "en-US", "md", &CatalogOptions::default()).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(
            cat.get(&MessageId::new("Note")).unwrap().locations,
            vec![Location::new("en-US/a.md", 1), Location::new("en-US/a.md", 5)]
        );
    }

    #[test]
    fn printf_blocks_are_flagged() {
        let (_dir, project) = docs_tree();
        let (cat, _) = extract_catalog(
            &project.source_root(),
            "en-US",
            "md",
            &CatalogOptions::default(),
        )
        .unwrap();
        let e = cat.get(&MessageId::new("Saved %(count)d bookmarks")).unwrap();
        assert!(e.flags.contains("python-format"));
        assert!(cat.get(&MessageId::new("# Usage")).unwrap().flags.is_empty());
    }

    #[test]
    fn extract_writes_template_sorted_by_file() {
        let (_dir, project) = docs_tree();
        let summary = extract(&project).unwrap();
        assert_eq!(summary.template, "translations/messages.pot");
        assert_eq!(summary.messages, 4);
        assert_eq!(summary.locations, 5);

        let text = fs::read_to_string(project.template_path()).unwrap();
        assert!(text.starts_with("# Translations template for PROJECT."));
        assert!(text.contains("#: en-US/guide/usage.md:3 en-US/index.md:3\nmsgid \"Shared note\""));
        let usage = text.find("msgid \"# Usage\"").unwrap();
        let welcome = text.find("msgid \"# Welcome\"").unwrap();
        assert!(usage < welcome);
    }

    #[test]
    fn missing_source_locale_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(extract(&Project::new(dir.path())).is_err());
    }
}
