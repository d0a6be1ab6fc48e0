// src/extractors/classifier.rs
use crate::extractors::fields::Diagnostic;
use crate::extractors::role::TableRole;
use crate::tables::{ExtractedTable, Renderings};

/// Tables picked for each role out of one document's renderings.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedTables {
    pub first: Option<ExtractedTable>,
    pub third: Option<ExtractedTable>,
    pub fourth: Option<ExtractedTable>,
}

impl ClassifiedTables {
    pub fn get(&self, role: TableRole) -> Option<&ExtractedTable> {
        match role {
            TableRole::FirstTable => self.first.as_ref(),
            TableRole::ThirdTable => self.third.as_ref(),
            TableRole::FourthTable => self.fourth.as_ref(),
        }
    }
}

fn is_first_table(text: &str) -> bool {
    // The delinquency report uses the same refinance vocabulary
    text.contains("refinance with fha") && !text.contains("delinquency")
}

fn is_third_table(text: &str) -> bool {
    text.contains("property improvement")
}

fn is_fourth_table(text: &str) -> bool {
    text.contains("first-time homebuyer") || text.contains("first time homebuyer")
}

/// Selects at most one table per role.
///
/// Each role reads the rendering its layout mode names. Table 1 and Table 3
/// are scanned together in one pass over their shared rendering: the latest
/// Table 1 candidate wins, and the scan stops at the first Table 3 match.
/// Table 4 is the first match in its own rendering. Fully empty rows are removed from
/// every selected table; each unresolved role adds a diagnostic.
pub fn classify(renderings: &Renderings, diagnostics: &mut Vec<Diagnostic>) -> ClassifiedTables {
    let mut selected = ClassifiedTables::default();

    debug_assert_eq!(TableRole::FirstTable.layout_mode(), TableRole::ThirdTable.layout_mode());
    let shared = renderings.tables(TableRole::FirstTable.layout_mode());
    for (index, table) in shared.iter().enumerate() {
        let text = table.flattened_text();
        if is_first_table(&text) {
            tracing::debug!("Table 1 candidate at index {}", index);
            selected.first = Some(table.clone());
        }
        if is_third_table(&text) {
            tracing::debug!("Table 3 found at index {}", index);
            selected.third = Some(table.clone());
            break;
        }
    }

    selected.fourth = renderings
        .tables(TableRole::FourthTable.layout_mode())
        .iter()
        .find(|table| is_fourth_table(&table.flattened_text()))
        .cloned();

    for role in TableRole::ALL {
        if selected.get(role).is_none() {
            diagnostics.push(Diagnostic::RoleNotFound { role });
        }
    }

    ClassifiedTables {
        first: selected.first.map(ExtractedTable::without_empty_rows),
        third: selected.third.map(ExtractedTable::without_empty_rows),
        fourth: selected.fourth.map(ExtractedTable::without_empty_rows),
    }
}
