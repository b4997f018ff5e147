use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "docloc.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocLocConfig {
    /// Documentation project root (holds `src/` and `translations/`).
    pub root: Option<String>,
    pub paths: Option<PathsCfg>,
    pub catalog: Option<CatalogCfg>,
    pub generate: Option<GenerateCfg>,
    pub check: Option<CheckCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsCfg {
    pub source_dir: Option<String>,
    pub source_locale: Option<String>,
    pub extension: Option<String>,
    pub translations_dir: Option<String>,
    pub template_file: Option<String>,
    pub catalog_file: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogCfg {
    pub project: Option<String>,
    pub version: Option<String>,
    pub copyright_holder: Option<String>,
    pub bugs_address: Option<String>,
    pub last_translator: Option<String>,
    pub language_team: Option<String>,
    pub header_comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateCfg {
    pub cutoff: Option<f64>,
    pub skip_locales: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckCfg {
    pub skip_locales: Option<Vec<String>>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn parse_config(path: &Path, text: &str) -> Result<DocLocConfig, ConfigError> {
    toml::from_str::<DocLocConfig>(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_config(path: &Path) -> Result<DocLocConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &text)
}

/// Load configuration. Search order: `explicit` (must exist), CWD/docloc.toml,
/// `<config dir>/docloc/docloc.toml`. Earlier sources win field by field.
pub fn load_config(explicit: Option<&Path>) -> Result<DocLocConfig, ConfigError> {
    let mut merged = DocLocConfig::default();
    if let Some(path) = explicit {
        merged = merge(merged, read_config(path)?);
    }
    if let Ok(p) = std::env::current_dir() {
        let path = p.join(CONFIG_FILE_NAME);
        if path.is_file() {
            merged = merge(merged, read_config(&path)?);
        }
    }
    if let Some(base) = dirs::config_dir() {
        let path = base.join("docloc").join(CONFIG_FILE_NAME);
        if path.is_file() {
            merged = merge(merged, read_config(&path)?);
        }
    }
    Ok(merged)
}

fn merge(mut a: DocLocConfig, b: DocLocConfig) -> DocLocConfig {
    if a.root.is_none() {
        a.root = b.root;
    }
    a.paths = merge_opt(a.paths, b.paths, merge_paths);
    a.catalog = merge_opt(a.catalog, b.catalog, merge_catalog);
    a.generate = merge_opt(a.generate, b.generate, merge_generate);
    a.check = merge_opt(a.check, b.check, merge_check);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_paths(mut a: PathsCfg, b: PathsCfg) -> PathsCfg {
    if a.source_dir.is_none() {
        a.source_dir = b.source_dir;
    }
    if a.source_locale.is_none() {
        a.source_locale = b.source_locale;
    }
    if a.extension.is_none() {
        a.extension = b.extension;
    }
    if a.translations_dir.is_none() {
        a.translations_dir = b.translations_dir;
    }
    if a.template_file.is_none() {
        a.template_file = b.template_file;
    }
    if a.catalog_file.is_none() {
        a.catalog_file = b.catalog_file;
    }
    if a.output_dir.is_none() {
        a.output_dir = b.output_dir;
    }
    a
}

fn merge_catalog(mut a: CatalogCfg, b: CatalogCfg) -> CatalogCfg {
    if a.project.is_none() {
        a.project = b.project;
    }
    if a.version.is_none() {
        a.version = b.version;
    }
    if a.copyright_holder.is_none() {
        a.copyright_holder = b.copyright_holder;
    }
    if a.bugs_address.is_none() {
        a.bugs_address = b.bugs_address;
    }
    if a.last_translator.is_none() {
        a.last_translator = b.last_translator;
    }
    if a.language_team.is_none() {
        a.language_team = b.language_team;
    }
    if a.header_comment.is_none() {
        a.header_comment = b.header_comment;
    }
    a
}

fn merge_generate(mut a: GenerateCfg, b: GenerateCfg) -> GenerateCfg {
    if a.cutoff.is_none() {
        a.cutoff = b.cutoff;
    }
    if a.skip_locales.is_none() {
        a.skip_locales = b.skip_locales;
    }
    a
}

fn merge_check(mut a: CheckCfg, b: CheckCfg) -> CheckCfg {
    if a.skip_locales.is_none() {
        a.skip_locales = b.skip_locales;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_sections() {
        let cfg = parse_config(
            Path::new("docloc.toml"),
            r#"
root = "docs"

[paths]
source_locale = "en-US"
extension = "md"

[catalog]
project = "Readeck User Documentation"
bugs_address = "translate@readeck.com"

[generate]
cutoff = 0.8
skip_locales = ["en_US"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.root.as_deref(), Some("docs"));
        assert_eq!(cfg.paths.unwrap().extension.as_deref(), Some("md"));
        assert_eq!(
            cfg.catalog.unwrap().project.as_deref(),
            Some("Readeck User Documentation")
        );
        let gen = cfg.generate.unwrap();
        assert_eq!(gen.cutoff, Some(0.8));
        assert_eq!(gen.skip_locales, Some(vec!["en_US".to_string()]));
    }

    #[test]
    fn earlier_source_wins_per_field() {
        let a = parse_config(Path::new("a"), "[generate]\ncutoff = 0.5\n").unwrap();
        let b = parse_config(
            Path::new("b"),
            "root = \"r\"\n[generate]\ncutoff = 0.9\nskip_locales = [\"en\"]\n",
        )
        .unwrap();
        let m = merge(a, b);
        assert_eq!(m.root.as_deref(), Some("r"));
        let gen = m.generate.unwrap();
        assert_eq!(gen.cutoff, Some(0.5));
        assert_eq!(gen.skip_locales, Some(vec!["en".to_string()]));
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let err = parse_config(Path::new("bad.toml"), "[generate\n").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
