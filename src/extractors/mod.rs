// src/extractors/mod.rs
pub mod classifier;
pub mod fields;
pub mod first_table;
pub mod fourth_table;
pub mod numeric;
pub mod period;
pub mod role;
pub mod rules;
pub mod third_table;

// Re-export key extraction types for convenience
pub use classifier::classify;
pub use fields::{Diagnostic, FieldDictionary, FieldValue};
pub use period::resolve_period;
pub use role::TableRole;
pub use rules::ExtractOptions;

use crate::tables::ExtractedTable;

/// Runs the row extractor belonging to `role` over `table`.
pub fn extract_role(
    role: TableRole,
    table: &ExtractedTable,
    dict: &mut FieldDictionary,
    diagnostics: &mut Vec<Diagnostic>,
    options: ExtractOptions,
) {
    match role {
        TableRole::FirstTable => first_table::extract(table, dict, diagnostics, options),
        TableRole::ThirdTable => third_table::extract(table, dict, diagnostics, options),
        TableRole::FourthTable => fourth_table::extract(table, dict, diagnostics, options),
    }
}
