use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractSummary {
    pub schema_version: u32,
    pub template: String,
    pub files: usize,
    pub messages: usize,
    pub locations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocaleUpdate {
    pub schema_version: u32,
    pub locale: String,
    pub path: String,
    /// "created" | "updated" | "failed"
    pub status: String,
    pub entries: usize,
    pub carried: usize,
    pub added: usize,
    pub dropped: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocaleCompletion {
    pub schema_version: u32,
    pub locale: String,
    pub translated: usize,
    pub total: usize,
    pub percent: u32,
    /// Passed the completion cutoff.
    pub included: bool,
    pub destination: Option<String>,
    pub files: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckEntry {
    pub po_line: Option<usize>,
    pub msgid: String,
    pub msgctxt: Option<String>,
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocaleCheck {
    pub schema_version: u32,
    pub locale: String,
    pub ok: bool,
    pub entries: Vec<CheckEntry>,
    pub error: Option<String>,
}
