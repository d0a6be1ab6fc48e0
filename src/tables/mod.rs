// src/tables/mod.rs
pub mod model;
pub mod tabula;

use std::path::Path;

use crate::utils::error::TableSourceError;

pub use model::{ExtractedTable, LayoutMode, Renderings};
pub use tabula::{SidecarSource, TabulaCli};

/// Anything that can turn a report PDF into a list of tables for a given
/// layout mode. Calls are synchronous and may be slow.
pub trait TableSource {
    fn read_tables(&self, pdf: &Path, mode: LayoutMode) -> Result<Vec<ExtractedTable>, TableSourceError>;
}
