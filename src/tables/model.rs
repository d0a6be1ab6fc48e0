// src/tables/model.rs
use std::fmt;

/// The two page-segmentation strategies the external extractor is run with.
///
/// Different report tables come out cleanly under different modes, so every
/// document is rendered once per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Extractor defaults with area guessing (`--guess`).
    Guess,
    /// Whitespace-driven column detection (`--guess --stream`).
    Stream,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 2] = [LayoutMode::Guess, LayoutMode::Stream];

    /// Short name used in sidecar file names and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Guess => "guess",
            LayoutMode::Stream => "stream",
        }
    }

    /// Extra tabula command-line flags for this mode.
    pub fn tabula_flags(self) -> &'static [&'static str] {
        match self {
            LayoutMode::Guess => &["--guess"],
            LayoutMode::Stream => &["--guess", "--stream"],
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A headerless grid of optional text cells as produced by the extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    rows: Vec<Vec<Option<String>>>,
    width: usize,
}

impl ExtractedTable {
    /// Builds a rectangular table, padding short rows with `None` and
    /// turning blank cell text into `None`.
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<Option<String>> = row
                    .into_iter()
                    .map(|cell| cell.filter(|text| !text.trim().is_empty()))
                    .collect();
                cells.resize(width, None);
                cells
            })
            .collect();
        Self { rows, width }
    }

    /// Convenience constructor from plain strings; `""` becomes an absent cell.
    #[cfg(test)]
    pub fn from_text_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of columns every row has.
    pub fn width(&self) -> usize {
        self.width
    }

    /// All present cells, lowercased and space-joined, for fingerprinting.
    pub fn flattened_text(&self) -> String {
        self.rows
            .iter()
            .flatten()
            .flatten()
            .map(|cell| cell.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Drops rows in which every cell is absent.
    pub fn without_empty_rows(mut self) -> Self {
        self.rows.retain(|row| row.iter().any(Option::is_some));
        self
    }
}

/// Both renderings of one document.
#[derive(Debug, Clone, Default)]
pub struct Renderings {
    pub guess: Vec<ExtractedTable>,
    pub stream: Vec<ExtractedTable>,
}

impl Renderings {
    pub fn tables(&self, mode: LayoutMode) -> &[ExtractedTable] {
        match mode {
            LayoutMode::Guess => &self.guess,
            LayoutMode::Stream => &self.stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_ragged_rows_and_blanks() {
        let table = ExtractedTable::new(vec![
            vec![Some("a".into())],
            vec![Some("b".into()), Some("  ".into()), Some("c".into())],
        ]);
        assert_eq!(table.width(), 3);
        assert_eq!(table.rows()[0], vec![Some("a".to_string()), None, None]);
        assert_eq!(table.rows()[1][1], None);
    }

    #[test]
    fn drops_fully_empty_rows_only() {
        let table = ExtractedTable::from_text_rows(vec![
            vec!["Claims", "1"],
            vec!["", ""],
            vec!["", "2"],
        ])
        .without_empty_rows();
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn flattens_lowercase_text() {
        let table = ExtractedTable::from_text_rows(vec![vec!["Refinance with FHA", ""], vec!["X", "Y"]]);
        assert_eq!(table.flattened_text(), "refinance with fha x y");
    }
}
