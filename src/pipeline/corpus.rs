// src/pipeline/corpus.rs
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indexmap::IndexSet;

use crate::extractors::fields::{FILENAME_COLUMN, PERIOD_COLUMN};
use crate::extractors::{FieldDictionary, TableRole};
use crate::pipeline::document::DocumentProcessor;
use crate::utils::AppError;

/// All documents' dictionaries for one role, ordered by period.
#[derive(Debug, Clone)]
pub struct CorpusTable {
    pub role: TableRole,
    rows: Vec<FieldDictionary>,
}

impl CorpusTable {
    pub fn new(role: TableRole) -> Self {
        Self { role, rows: Vec::new() }
    }

    /// Appends a row unless it holds nothing but the base keys.
    pub fn push(&mut self, dict: FieldDictionary) -> bool {
        if !dict.has_data() {
            tracing::debug!("No {} data in {}", self.role, dict.filename);
            return false;
        }
        self.rows.push(dict);
        true
    }

    /// Stable sort by period; rows without a period go last.
    pub fn sort_by_period(&mut self) {
        self.rows.sort_by(|a, b| match (a.period, b.period) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    pub fn rows(&self) -> &[FieldDictionary] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `date`, `filename`, then every populated key in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: IndexSet<String> = [PERIOD_COLUMN, FILENAME_COLUMN].iter().map(|c| c.to_string()).collect();
        for row in &self.rows {
            for (key, _) in row.fields() {
                if !columns.contains(key) {
                    columns.insert(key.to_string());
                }
            }
        }
        columns.into_iter().collect()
    }

    /// Earliest and latest resolved period.
    pub fn period_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut periods = self.rows.iter().filter_map(|row| row.period);
        let first = periods.next()?;
        Some(periods.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Outcome of a corpus pass.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub tables: BTreeMap<TableRole, CorpusTable>,
    pub documents: usize,
    pub failed_documents: usize,
}

impl Corpus {
    #[cfg(test)]
    pub fn table(&self, role: TableRole) -> Option<&CorpusTable> {
        self.tables.get(&role)
    }

    /// Logs extracted counts, columns and period ranges per table.
    pub fn log_summary(&self) {
        tracing::info!("{}", "=".repeat(60));
        tracing::info!("SUMMARY: {} documents, {} skipped", self.documents, self.failed_documents);
        for table in self.tables.values() {
            tracing::info!("{}: extracted from {} reports", table.role, table.len());
            if table.is_empty() {
                continue;
            }
            tracing::info!("{} columns: {}", table.role, table.columns().join(", "));
            if let Some((first, last)) = table.period_range() {
                tracing::info!("{} period range: {} to {}", table.role, first, last);
            }
        }
        tracing::info!("{}", "=".repeat(60));
    }
}

/// Report PDFs in `dir`, sorted by path.
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::Config(format!("Directory '{}' not found", dir.display())));
    }

    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();

    if pdfs.is_empty() {
        return Err(AppError::Config(format!("No PDF files found in '{}'", dir.display())));
    }
    Ok(pdfs)
}

/// Processes every PDF in `dir` sequentially and assembles the three tables.
pub fn extract_corpus(dir: &Path, processor: &DocumentProcessor<'_>) -> Result<Corpus, AppError> {
    let documents = list_documents(dir)?;
    tracing::info!("Found {} PDF files. Extracting tables...", documents.len());

    let mut tables: BTreeMap<TableRole, CorpusTable> =
        TableRole::ALL.iter().map(|role| (*role, CorpusTable::new(*role))).collect();
    let mut failed_documents = 0;

    for (i, pdf) in documents.iter().enumerate() {
        tracing::info!("Processing: {} {}", i + 1, pdf.display());
        let report = processor.process(pdf);
        report.log_diagnostics();
        if report.failed() {
            failed_documents += 1;
            continue;
        }
        for (role, dict) in report.records {
            if let Some(table) = tables.get_mut(&role) {
                table.push(dict);
            }
        }
    }

    for table in tables.values_mut() {
        table.sort_by_period();
        tracing::info!("Successfully extracted {} from {} reports.", table.role, table.len());
    }

    Ok(Corpus {
        tables,
        documents: documents.len(),
        failed_documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{ExtractOptions, FieldValue};
    use crate::tables::{LayoutMode, SidecarSource};
    use std::fs;

    const TABLE_ONE: &str = r#"[{"extraction_method":"lattice","data":[
        [{"text":"Insurance-in-Force (Beginning)"},{"text":"8,000,000"},{"text":"1,200.0"}],
        [{"text":"Refinance with FHA"},{"text":"(1,000)"},{"text":"(0.2)"}],
        [{"text":""},{"text":""},{"text":""}]
    ]}]"#;

    const TABLE_FOUR: &str = r#"[{"extraction_method":"stream","data":[
        [{"text":"First-Time Homebuyer (%)"},{"text":"82.5"},{"text":"81.0"}],
        [{"text":"Purchase (%)"},{"text":"70.1"},{"text":"69.0"}]
    ]}]"#;

    fn write_document(dir: &Path, name: &str, guess: &str, stream: &str) {
        let pdf = dir.join(name);
        fs::write(&pdf, b"%PDF-1.4").unwrap();
        fs::write(SidecarSource::sidecar_path(&pdf, LayoutMode::Guess), guess).unwrap();
        fs::write(SidecarSource::sidecar_path(&pdf, LayoutMode::Stream), stream).unwrap();
    }

    #[test]
    fn three_documents_sorted_by_period() {
        let dir = tempfile::tempdir().unwrap();
        // Directory order differs from period order
        write_document(dir.path(), "FHAProdReport_Aug2021.pdf", TABLE_ONE, TABLE_FOUR);
        write_document(dir.path(), "FHAProdReport_Dec2020.pdf", TABLE_ONE, TABLE_FOUR);
        write_document(dir.path(), "FHAProdReport_Mar2021.pdf", TABLE_ONE, "[]");

        let source = SidecarSource;
        let processor = DocumentProcessor::new(&source, ExtractOptions::default());
        let corpus = extract_corpus(dir.path(), &processor).unwrap();

        let first = corpus.table(TableRole::FirstTable).unwrap();
        let periods: Vec<Option<NaiveDate>> = first.rows().iter().map(|r| r.period).collect();
        assert_eq!(
            periods,
            vec![
                NaiveDate::from_ymd_opt(2020, 12, 1),
                NaiveDate::from_ymd_opt(2021, 3, 1),
                NaiveDate::from_ymd_opt(2021, 8, 1),
            ]
        );
        for row in first.rows() {
            assert!(row.has_data());
            assert!(row.period.is_some());
            assert!(row.filename.starts_with("FHAProdReport_"));
        }
        assert_eq!(first.rows()[0].get("refi_fha_k"), Some(&FieldValue::Decimal("-1000".into())));
        assert_eq!(
            first.columns(),
            ["date", "filename", "insurance_beg_k", "insurance_beg_b", "refi_fha_k", "refi_fha_b"]
        );

        assert_eq!(corpus.table(TableRole::FourthTable).unwrap().len(), 2);
        assert!(corpus.table(TableRole::ThirdTable).unwrap().is_empty());
        assert_eq!(corpus.documents, 3);
        assert_eq!(corpus.failed_documents, 0);
    }

    #[test]
    fn failing_document_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "FHAProdReport_Jan2022.pdf", TABLE_ONE, TABLE_FOUR);
        fs::write(dir.path().join("FHAProdReport_Feb2022.pdf"), b"%PDF-1.4").unwrap();

        let source = SidecarSource;
        let processor = DocumentProcessor::new(&source, ExtractOptions::default());
        let corpus = extract_corpus(dir.path(), &processor).unwrap();

        assert_eq!(corpus.failed_documents, 1);
        assert_eq!(corpus.table(TableRole::FirstTable).unwrap().len(), 1);
    }

    #[test]
    fn missing_or_empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(list_documents(dir.path()), Err(AppError::Config(_))));
        assert!(matches!(list_documents(&dir.path().join("nope")), Err(AppError::Config(_))));
    }

    #[test]
    fn undated_rows_sort_last() {
        let mut table = CorpusTable::new(TableRole::FirstTable);
        for (period, name) in [(None, "x.pdf"), (NaiveDate::from_ymd_opt(2020, 1, 1), "a.pdf")] {
            let mut dict = FieldDictionary::new(period, name);
            dict.insert("claims_k", FieldValue::Null);
            assert!(table.push(dict));
        }
        assert!(!table.push(FieldDictionary::new(None, "empty.pdf")));
        table.sort_by_period();
        assert_eq!(table.rows()[0].filename, "a.pdf");
        assert_eq!(table.period_range(), NaiveDate::from_ymd_opt(2020, 1, 1).map(|d| (d, d)));
    }
}
