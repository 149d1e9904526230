//! Export and import of code modules
//!
//! - [`Exporter`]: document -> files
//! - [`Importer`]: files -> document, reconciling by component name

mod export;
mod import;
mod report;

pub use export::Exporter;
pub use import::Importer;
pub use report::{DocumentReport, SyncReport};

/// Component name comparison, ignoring ASCII case as VBA does.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
