use docloc_core::{DocLocError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A maximal run of non-blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// 1-based line number of the first line of the run.
    pub start_line: usize,
    /// The run's lines (trailing whitespace trimmed) joined by `\n`.
    pub text: String,
}

impl Block {
    pub fn new(start_line: usize, text: impl Into<String>) -> Self {
        Self {
            start_line,
            text: text.into(),
        }
    }
}

/// Lazy block iterator over a document; see [`tokenize`].
pub struct Blocks<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let mut start_line = 0;
        let mut acc: Vec<&'a str> = Vec::new();

        for (idx, line) in self.lines.by_ref() {
            if line.trim().is_empty() {
                if !acc.is_empty() {
                    return Some(Block::new(start_line, acc.join("\n")));
                }
                continue;
            }
            if acc.is_empty() {
                start_line = idx + 1;
            }
            acc.push(line.trim_end());
        }

        // last run of a document without a trailing blank line
        if acc.is_empty() {
            None
        } else {
            Some(Block::new(start_line, acc.join("\n")))
        }
    }
}

/// Split `text` into blank-line separated blocks. Whitespace-only lines count
/// as blank; leading, trailing and repeated blank lines never yield a block.
pub fn tokenize(text: &str) -> Blocks<'_> {
    Blocks {
        lines: text.lines().enumerate(),
    }
}

/// A source document found under the scan root.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path relative to the scan root, '/'-separated. Used as location key.
    pub rel_path: String,
    pub path: PathBuf,
}

fn rel_path_of(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Recursively collect files under `root/source_dir` whose extension is
/// `extension`, in file-name order within each directory.
pub fn discover_documents(
    root: &Path,
    source_dir: &str,
    extension: &str,
) -> Result<Vec<SourceDocument>> {
    let dir = root.join(source_dir);
    if !dir.is_dir() {
        return Err(DocLocError::io(
            &dir,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "source directory does not exist",
            ),
        )
        .into());
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
            DocLocError::Io {
                path,
                source: err.into(),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == extension)
            .unwrap_or(false);
        if matches {
            out.push(SourceDocument {
                rel_path: rel_path_of(root, path),
                path: path.to_path_buf(),
            });
        }
    }
    tracing::debug!(event = "documents_discovered", dir = %dir.display(), count = out.len());
    Ok(out)
}

/// Read one document and materialize its blocks.
pub fn scan_document(doc: &SourceDocument) -> Result<Vec<Block>> {
    let text = std::fs::read_to_string(&doc.path).map_err(|e| DocLocError::io(&doc.path, e))?;
    Ok(tokenize(&text).collect())
}
