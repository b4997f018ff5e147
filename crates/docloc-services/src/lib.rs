//! High-level orchestration over the lower-level crates.
//! Exposes the pipeline stages used by the CLI: extract, update, generate, check.

pub mod check;
pub mod extract;
pub mod generate;
pub mod header;
pub mod project;
pub mod update;

pub use check::{check, check_catalog};
pub use docloc_core::{Catalog, DocLocError, Result};
pub use extract::{extract, extract_catalog};
pub use generate::{
    completion, count_translated, generate, passes_gate, regenerate, GeneratedDocument,
};
pub use header::CatalogOptions;
pub use project::{Project, DEFAULT_CUTOFF};
pub use update::{sync, sync_with_stats, update, SyncStats};
