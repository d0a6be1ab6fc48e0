// src/extractors/role.rs
use std::fmt;

use crate::tables::LayoutMode;

/// The three report tables this crate extracts, identified by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableRole {
    /// Table 1: Single Family Insured Mortgage Portfolio Change during Month.
    FirstTable,
    /// Table 3: Title I Insured Mortgage Portfolio.
    ThirdTable,
    /// Table 4: Single-Family Insured Mortgage Endorsement Characteristic Shares.
    FourthTable,
}

impl TableRole {
    pub const ALL: [TableRole; 3] = [TableRole::FirstTable, TableRole::ThirdTable, TableRole::FourthTable];

    /// Which rendering of the document this role is read from.
    pub fn layout_mode(self) -> LayoutMode {
        match self {
            TableRole::FirstTable | TableRole::ThirdTable => LayoutMode::Guess,
            // Guess mode merges this table's columns
            TableRole::FourthTable => LayoutMode::Stream,
        }
    }

    /// Short tag used in output file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            TableRole::FirstTable => "tab1",
            TableRole::ThirdTable => "tab3",
            TableRole::FourthTable => "tab4",
        }
    }
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableRole::FirstTable => "Table 1",
            TableRole::ThirdTable => "Table 3",
            TableRole::FourthTable => "Table 4",
        };
        f.write_str(name)
    }
}
