// src/pipeline/document.rs
use std::collections::BTreeMap;
use std::path::Path;

use crate::extractors::{self, classify, resolve_period, Diagnostic, ExtractOptions, FieldDictionary, TableRole};
use crate::tables::{LayoutMode, Renderings, TableSource};
use crate::utils::error::TableSourceError;

/// Everything extracted from one report PDF.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub filename: String,
    /// One dictionary per role whose table was found.
    pub records: BTreeMap<TableRole, FieldDictionary>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentReport {
    #[cfg(test)]
    pub fn record(&self, role: TableRole) -> Option<&FieldDictionary> {
        self.records.get(&role)
    }

    /// True when the document was skipped as a whole.
    pub fn failed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::DocumentFailed { .. }))
    }

    /// Emits the collected diagnostics as warnings.
    pub fn log_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            match diagnostic {
                Diagnostic::DocumentFailed { .. } => {
                    tracing::error!("Error processing {}: {}", self.filename, diagnostic)
                }
                _ => tracing::warn!("{}: {}", self.filename, diagnostic),
            }
        }
    }
}

/// Classifies and extracts the three report tables of a single PDF.
pub struct DocumentProcessor<'a> {
    source: &'a dyn TableSource,
    options: ExtractOptions,
}

impl<'a> DocumentProcessor<'a> {
    pub fn new(source: &'a dyn TableSource, options: ExtractOptions) -> Self {
        Self { source, options }
    }

    /// Processes one document. Never fails: a table-source error is recorded
    /// as a `DocumentFailed` diagnostic and no records are returned.
    pub fn process(&self, pdf: &Path) -> DocumentReport {
        let filename = pdf
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let period = resolve_period(&filename);

        let mut report = DocumentReport {
            filename,
            records: BTreeMap::new(),
            diagnostics: Vec::new(),
        };
        if period.is_none() {
            report.diagnostics.push(Diagnostic::PeriodUnresolved);
        }

        let renderings = match self.render(pdf) {
            Ok(renderings) => renderings,
            Err(e) => {
                report.diagnostics.push(Diagnostic::DocumentFailed { cause: e.to_string() });
                return report;
            }
        };

        let classified = classify(&renderings, &mut report.diagnostics);
        for role in TableRole::ALL {
            let Some(table) = classified.get(role) else {
                continue;
            };
            tracing::debug!(
                "{}: {} has {} rows x {} columns",
                report.filename,
                role,
                table.rows().len(),
                table.width()
            );
            let mut dict = FieldDictionary::new(period, report.filename.clone());
            extractors::extract_role(role, table, &mut dict, &mut report.diagnostics, self.options);
            report.records.insert(role, dict);
        }

        report
    }

    fn render(&self, pdf: &Path) -> Result<Renderings, TableSourceError> {
        let mut renderings = Renderings::default();
        for mode in LayoutMode::ALL {
            let tables = self.source.read_tables(pdf, mode)?;
            tracing::debug!("{} {} rendering: {} tables", pdf.display(), mode, tables.len());
            match mode {
                LayoutMode::Guess => renderings.guess = tables,
                LayoutMode::Stream => renderings.stream = tables,
            }
        }
        Ok(renderings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::extractors::FieldValue;
    use crate::tables::ExtractedTable;

    struct FixedSource {
        renderings: Renderings,
    }

    impl TableSource for FixedSource {
        fn read_tables(&self, _pdf: &Path, mode: LayoutMode) -> Result<Vec<ExtractedTable>, TableSourceError> {
            Ok(self.renderings.tables(mode).to_vec())
        }
    }

    struct BrokenSource;

    impl TableSource for BrokenSource {
        fn read_tables(&self, pdf: &Path, _mode: LayoutMode) -> Result<Vec<ExtractedTable>, TableSourceError> {
            Err(TableSourceError::Io {
                path: pdf.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }
    }

    #[test]
    fn extracts_found_roles_and_reports_missing_ones() {
        let source = FixedSource {
            renderings: Renderings {
                guess: vec![ExtractedTable::from_text_rows(vec![
                    vec!["Refinance with FHA", "(12,000)", "(2.2)"],
                    vec!["Claims", "(5,000)", "(0.8)"],
                ])],
                stream: vec![],
            },
        };
        let processor = DocumentProcessor::new(&source, ExtractOptions::default());
        let report = processor.process(Path::new("/data/FHAProdReport_Dec2021.pdf"));

        assert_eq!(report.filename, "FHAProdReport_Dec2021.pdf");
        let first = report.record(TableRole::FirstTable).expect("table 1");
        assert_eq!(first.get("claims_k"), Some(&FieldValue::Decimal("-5000".into())));
        assert_eq!(first.period, NaiveDate::from_ymd_opt(2021, 12, 1));
        assert!(report.record(TableRole::ThirdTable).is_none());
        assert!(report.diagnostics.contains(&Diagnostic::RoleNotFound { role: TableRole::FourthTable }));
        assert!(!report.failed());
    }

    #[test]
    fn source_errors_skip_the_document() {
        let processor = DocumentProcessor::new(&BrokenSource, ExtractOptions::default());
        let report = processor.process(Path::new("noperiodhere.pdf"));
        assert!(report.records.is_empty());
        assert!(report.failed());
        assert_eq!(report.diagnostics[0], Diagnostic::PeriodUnresolved);
    }
}
