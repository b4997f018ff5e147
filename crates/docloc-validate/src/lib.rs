use docloc_core::{Catalog, Entry, MessageId, Translation};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// One problem reported by a checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Machine-readable kind: "placeholders" | "plural-forms"
    pub kind: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// All findings for one entry.
#[derive(Debug, Clone)]
pub struct EntryFindings {
    pub id: MessageId,
    /// Line of the entry in the catalog file, when it came from disk.
    pub po_line: Option<usize>,
    pub findings: Vec<Finding>,
}

/// A linguistic/format check applied to every entry of a catalog.
pub trait Checker {
    fn check(&self, catalog: &Catalog, entry: &Entry) -> Vec<Finding>;
}

/// Run `checkers` over every entry and keep the entries that produced findings.
pub fn validate(catalog: &Catalog, checkers: &[Box<dyn Checker>]) -> Vec<EntryFindings> {
    catalog
        .iter()
        .filter_map(|entry| {
            let findings: Vec<Finding> = checkers
                .iter()
                .flat_map(|c| c.check(catalog, entry))
                .collect();
            if findings.is_empty() {
                None
            } else {
                Some(EntryFindings {
                    id: entry.id.clone(),
                    po_line: entry.po_line,
                    findings,
                })
            }
        })
        .collect()
}

pub fn default_checkers() -> Vec<Box<dyn Checker>> {
    vec![Box::new(PlaceholderChecker), Box::new(PluralFormsChecker)]
}

fn printf_re() -> &'static Regex {
    static RE_PCT: OnceLock<Regex> = OnceLock::new();
    RE_PCT.get_or_init(|| {
        Regex::new(r"%%|%(?:\([\w]*\))?(?:\d+\$)?[-#0+]?(?:\*|\d+)?(?:\.(?:\*|\d+))?[hlL]?[diouxXeEfFgGcrs]")
            .expect("valid printf placeholder regex")
    })
}

/// Printf-style placeholders (`%s`, `%(name)s`, `%1$d`), `%%` excluded.
fn printf_placeholders(s: &str) -> Vec<String> {
    printf_re()
        .find_iter(s)
        .map(|m| m.as_str().to_string())
        .filter(|m| m != "%%")
        .collect()
}

/// Whether `s` contains printf-style placeholders; extraction flags such
/// messages `python-format`. A space flag is not accepted so that prose like
/// "100% sure" does not qualify.
pub fn has_printf_placeholders(s: &str) -> bool {
    !printf_placeholders(s).is_empty()
}

/// Brace placeholders (`{name}`, `{0}`).
fn brace_placeholders(s: &str) -> Vec<String> {
    static RE_BRACE: OnceLock<Regex> = OnceLock::new();
    let re = RE_BRACE.get_or_init(|| Regex::new(r"\{\w+\}").expect("valid brace placeholder regex"));
    re.find_iter(s).map(|m| m.as_str().to_string()).collect()
}

fn placeholders(s: &str, printf: bool) -> Vec<String> {
    let mut set = brace_placeholders(s);
    if printf {
        set.extend(printf_placeholders(s));
    }
    set.sort();
    set
}

/// Source and translation must carry the same placeholders. Printf-style
/// placeholders are only compared for entries flagged `python-format` or
/// `c-format`; brace placeholders always are.
pub struct PlaceholderChecker;

impl Checker for PlaceholderChecker {
    fn check(&self, _catalog: &Catalog, entry: &Entry) -> Vec<Finding> {
        let printf = entry.flags.contains("python-format") || entry.flags.contains("c-format");
        let mut out = Vec::new();
        for (i, form) in entry.translation.forms().into_iter().enumerate() {
            if form.trim().is_empty() {
                continue;
            }
            let source = match (i, &entry.id_plural) {
                (0, _) | (_, None) => entry.id.id.as_str(),
                (_, Some(plural)) => plural.as_str(),
            };
            let expected = placeholders(source, printf);
            let found = placeholders(form, printf);
            if expected != found {
                out.push(Finding {
                    kind: "placeholders".into(),
                    message: format!(
                        "placeholders {:?} in translation do not match {:?} in source",
                        found, expected
                    ),
                });
            }
        }
        out
    }
}

/// Plural entries must provide exactly `nplurals` forms.
pub struct PluralFormsChecker;

impl Checker for PluralFormsChecker {
    fn check(&self, catalog: &Catalog, entry: &Entry) -> Vec<Finding> {
        if entry.id_plural.is_none() {
            return Vec::new();
        }
        let expected = catalog.num_plurals();
        let got = match &entry.translation {
            Translation::Plural(forms) => forms.len(),
            Translation::Singular(_) => 1,
        };
        if got == expected {
            return Vec::new();
        }
        vec![Finding {
            kind: "plural-forms".into(),
            message: format!("wrong number of plural forms (expected {expected}, found {got})"),
        }]
    }
}
