use chrono::{Datelike, Local};
use docloc_config::CatalogCfg;
use docloc_core::{Catalog, DEFAULT_DOMAIN};

pub const DEFAULT_HEADER_COMMENT: &str = "\
# Translations template for PROJECT.
# Copyright (C) YEAR ORGANIZATION
# This file is distributed under the same license as the PROJECT project.
#";

pub const DEFAULT_PLURAL_FORMS: &str = "nplurals=2; plural=(n != 1);";

/// Project metadata written into catalog headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    pub project: String,
    pub version: String,
    pub copyright_holder: String,
    pub bugs_address: String,
    pub last_translator: String,
    pub language_team: String,
    pub header_comment: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            project: "PROJECT".into(),
            version: "VERSION".into(),
            copyright_holder: "ORGANIZATION".into(),
            bugs_address: "EMAIL@ADDRESS".into(),
            last_translator: "FULL NAME <EMAIL@ADDRESS>".into(),
            language_team: "LANGUAGE <LL@li.org>".into(),
            header_comment: DEFAULT_HEADER_COMMENT.into(),
        }
    }
}

impl CatalogOptions {
    pub fn from_config(cfg: Option<&CatalogCfg>) -> Self {
        let mut out = Self::default();
        let Some(cfg) = cfg else {
            return out;
        };
        let fields = [
            (&mut out.project, &cfg.project),
            (&mut out.version, &cfg.version),
            (&mut out.copyright_holder, &cfg.copyright_holder),
            (&mut out.bugs_address, &cfg.bugs_address),
            (&mut out.last_translator, &cfg.last_translator),
            (&mut out.language_team, &cfg.language_team),
            (&mut out.header_comment, &cfg.header_comment),
        ];
        for (slot, value) in fields {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        out
    }

    /// Header comment with placeholders substituted. Locale catalogs read
    /// "<locale> translations" where the template reads "Translations template".
    pub fn render_comment(&self, year: i32, locale: Option<&str>) -> String {
        let mut text = self
            .header_comment
            .replace("PROJECT", &self.project)
            .replace("VERSION", &self.version)
            .replace("YEAR", &year.to_string())
            .replace("ORGANIZATION", &self.copyright_holder);
        if let Some(locale) = locale {
            text = text.replace("Translations template", &format!("{locale} translations"));
        }
        text
    }
}

/// Current local time in PO header format, plus the year for the comment.
pub fn po_timestamp() -> (String, i32) {
    let now = Local::now();
    (now.format("%Y-%m-%d %H:%M%z").to_string(), now.year())
}

/// Empty template catalog carrying the project header.
pub fn template_catalog(opts: &CatalogOptions, creation_date: &str, year: i32) -> Catalog {
    let mut cat = Catalog::new(None, DEFAULT_DOMAIN);
    cat.header_comment = opts.render_comment(year, None);
    cat.fuzzy_header = true;
    cat.metadata = base_metadata(opts, creation_date);
    cat
}

/// Empty catalog for a locale that has never been translated.
pub fn locale_catalog(opts: &CatalogOptions, locale: &str, creation_date: &str, year: i32) -> Catalog {
    let mut cat = Catalog::new(Some(locale.to_string()), DEFAULT_DOMAIN);
    cat.header_comment = opts.render_comment(year, Some(locale));
    cat.fuzzy_header = true;
    cat.metadata = base_metadata(opts, creation_date);
    cat.set_header("Language", locale);
    cat.set_header("Plural-Forms", DEFAULT_PLURAL_FORMS);
    cat
}

fn base_metadata(opts: &CatalogOptions, creation_date: &str) -> Vec<(String, String)> {
    [
        ("Project-Id-Version", format!("{} {}", opts.project, opts.version)),
        ("Report-Msgid-Bugs-To", opts.bugs_address.clone()),
        ("POT-Creation-Date", creation_date.to_string()),
        ("PO-Revision-Date", "YEAR-MO-DA HO:MI+ZONE".to_string()),
        ("Last-Translator", opts.last_translator.clone()),
        ("Language-Team", opts.language_team.clone()),
        ("MIME-Version", "1.0".to_string()),
        ("Content-Type", "text/plain; charset=utf-8".to_string()),
        ("Content-Transfer-Encoding", "8bit".to_string()),
        ("Generated-By", format!("docloc {}", env!("CARGO_PKG_VERSION"))),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}
