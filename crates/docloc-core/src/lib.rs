use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod catalog;

pub use catalog::{Catalog, Entry, DEFAULT_DOMAIN};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Error kinds the pipeline distinguishes. They travel inside
/// `color_eyre::Report` and can be recovered with `downcast_ref`.
#[derive(Debug, Error)]
pub enum DocLocError {
    #[error("template catalog not found at {}; run `extract` first", path.display())]
    MissingTemplate { path: PathBuf },

    #[error("{}:{line}: {message}", path.display())]
    MalformedCatalog {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O failure on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocLocError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        DocLocError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Deduplication key of a translatable unit: exact source text plus optional context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId {
    pub id: String,
    pub context: Option<String>,
}

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context: None,
        }
    }

    pub fn with_context(id: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context: Some(context.into()),
        }
    }
}

/// Where a block was found: root-relative path ('/'-separated) and 1-based line.
/// Line 0 means the reference carried no line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

/// Translated value of an entry. Plural messages carry one string per form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Translation {
    Singular(String),
    Plural(Vec<String>),
}

impl Default for Translation {
    fn default() -> Self {
        Translation::Singular(String::new())
    }
}

impl Translation {
    /// Blank when the singular string (or any plural form) is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Translation::Singular(s) => s.trim().is_empty(),
            Translation::Plural(forms) => {
                forms.is_empty() || forms.iter().any(|f| f.trim().is_empty())
            }
        }
    }

    /// The singular string, or the first plural form.
    pub fn first(&self) -> &str {
        match self {
            Translation::Singular(s) => s,
            Translation::Plural(forms) => forms.first().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn forms(&self) -> Vec<&str> {
        match self {
            Translation::Singular(s) => vec![s.as_str()],
            Translation::Plural(forms) => forms.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_blankness_requires_every_form() {
        let t = Translation::Plural(vec!["un".into(), "  ".into()]);
        assert!(t.is_blank());
        let t = Translation::Plural(vec!["un".into(), "deux".into()]);
        assert!(!t.is_blank());
        assert!(Translation::Singular(" \n".into()).is_blank());
        assert!(Translation::default().is_blank());
    }

    #[test]
    fn location_display_omits_missing_line() {
        assert_eq!(Location::new("en-US/a.md", 3).to_string(), "en-US/a.md:3");
        assert_eq!(Location::new("en-US/a.md", 0).to_string(), "en-US/a.md");
    }

    #[test]
    fn malformed_catalog_message_names_path_and_line() {
        let err = DocLocError::MalformedCatalog {
            path: PathBuf::from("translations/fr/messages.po"),
            line: 12,
            message: "unexpected line".into(),
        };
        assert_eq!(
            err.to_string(),
            "translations/fr/messages.po:12: unexpected line"
        );
    }
}
