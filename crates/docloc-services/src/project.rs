use crate::header::CatalogOptions;
use docloc_config::DocLocConfig;
use docloc_core::{Catalog, DocLocError, Result};
use std::path::{Path, PathBuf};

/// Default share of translated entries a locale needs before it is generated.
pub const DEFAULT_CUTOFF: f64 = 0.90;

/// Resolved layout of one documentation project.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    /// Directory (relative to `root`) holding one subdirectory per locale.
    pub source_dir: String,
    pub source_locale: String,
    pub extension: String,
    pub translations_dir: PathBuf,
    pub template_file: String,
    pub catalog_file: String,
    pub output_dir: PathBuf,
    pub catalog: CatalogOptions,
    pub cutoff: f64,
    pub generate_skip: Vec<String>,
    pub check_skip: Vec<String>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let source_locale = "en-US".to_string();
        let skip = default_skip(&source_locale);
        Self {
            translations_dir: root.join("translations"),
            output_dir: root.join("src"),
            root,
            source_dir: "src".into(),
            source_locale,
            extension: "md".into(),
            template_file: "messages.pot".into(),
            catalog_file: "messages.po".into(),
            catalog: CatalogOptions::default(),
            cutoff: DEFAULT_CUTOFF,
            generate_skip: skip.clone(),
            check_skip: skip,
        }
    }

    /// Apply a loaded config on top of the defaults. `root` (from the command
    /// line) beats `cfg.root`; relative paths in the config resolve against the
    /// project root.
    pub fn from_config(root: Option<&Path>, cfg: &DocLocConfig) -> Self {
        let root = root
            .map(Path::to_path_buf)
            .or_else(|| cfg.root.as_deref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let mut p = Project::new(root);

        if let Some(paths) = &cfg.paths {
            if let Some(v) = &paths.source_dir {
                p.source_dir = v.clone();
                p.output_dir = p.root.join(v);
            }
            if let Some(v) = &paths.source_locale {
                p.source_locale = v.clone();
                p.generate_skip = default_skip(v);
                p.check_skip = default_skip(v);
            }
            if let Some(v) = &paths.extension {
                p.extension = v.trim_start_matches('.').to_string();
            }
            if let Some(v) = &paths.translations_dir {
                p.translations_dir = p.root.join(v);
            }
            if let Some(v) = &paths.template_file {
                p.template_file = v.clone();
            }
            if let Some(v) = &paths.catalog_file {
                p.catalog_file = v.clone();
            }
            if let Some(v) = &paths.output_dir {
                p.output_dir = p.root.join(v);
            }
        }
        p.catalog = CatalogOptions::from_config(cfg.catalog.as_ref());
        if let Some(gen) = &cfg.generate {
            if let Some(c) = gen.cutoff {
                p.cutoff = c;
            }
            if let Some(skip) = &gen.skip_locales {
                p.generate_skip = skip.clone();
            }
        }
        if let Some(skip) = cfg.check.as_ref().and_then(|c| c.skip_locales.as_ref()) {
            p.check_skip = skip.clone();
        }
        p
    }

    /// Directory scanned during extraction; locations are relative to it.
    pub fn source_root(&self) -> PathBuf {
        self.root.join(&self.source_dir)
    }

    pub fn template_path(&self) -> PathBuf {
        self.translations_dir.join(&self.template_file)
    }

    pub fn catalog_path(&self, locale: &str) -> PathBuf {
        self.translations_dir.join(locale).join(&self.catalog_file)
    }

    /// Every subdirectory of the translations directory, sorted by name.
    /// A missing translations directory yields no locales.
    pub fn locale_dirs(&self) -> Result<Vec<String>> {
        let dir = &self.translations_dir;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| DocLocError::io(dir, e))? {
            let entry = entry.map_err(|e| DocLocError::io(dir, e))?;
            if entry.path().is_dir() {
                out.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        out.sort();
        Ok(out)
    }

    /// Locales that already have a catalog file, minus `skip`.
    pub fn locale_catalogs(&self, skip: &[String]) -> Result<Vec<(String, PathBuf)>> {
        Ok(self
            .locale_dirs()?
            .into_iter()
            .filter(|code| !skip.iter().any(|s| s == code))
            .map(|code| {
                let path = self.catalog_path(&code);
                (code, path)
            })
            .filter(|(_, path)| path.is_file())
            .collect())
    }

    /// Read the template, failing with `MissingTemplate` when it is absent.
    pub fn load_template(&self) -> Result<Catalog> {
        let path = self.template_path();
        if !path.is_file() {
            return Err(DocLocError::MissingTemplate { path }.into());
        }
        docloc_import_po::read_po(&path, None)
    }

    /// `path` relative to the project root, for display.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn default_skip(source_locale: &str) -> Vec<String> {
    let underscored = source_locale.replace('-', "_");
    if underscored == source_locale {
        vec![source_locale.to_string()]
    } else {
        vec![source_locale.to_string(), underscored]
    }
}
