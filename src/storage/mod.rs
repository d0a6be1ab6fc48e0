// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::extractors::fields::{FILENAME_COLUMN, PERIOD_COLUMN};
use crate::extractors::FieldValue;
use crate::pipeline::CorpusTable;
use crate::utils::error::StorageError;

/// Paths written for one corpus table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTable {
    pub current: PathBuf,
    pub snapshot: PathBuf,
}

pub struct StorageManager {
    base_dir: PathBuf,
    prefix: String,
}

impl StorageManager {
    /// Creates a new StorageManager writing `<prefix>_<tag>.csv` files into `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P, prefix: impl Into<String>) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self {
            base_dir: base_path,
            prefix: prefix.into(),
        })
    }

    /// Writes the table as CSV plus a `.bak` snapshot stamped with `today`.
    pub fn save_table(&self, table: &CorpusTable, today: NaiveDate) -> Result<SavedTable, StorageError> {
        let tag = table.role.file_tag();
        let current = self.base_dir.join(format!("{}_{}.csv", self.prefix, tag));
        let snapshot = self
            .base_dir
            .join(format!("{}_{}_{}.bak", self.prefix, tag, today.format("%Y-%m-%d")));

        write_csv(table, &snapshot)?;
        write_csv(table, &current)?;

        tracing::info!("{} data saved to: {}", table.role, current.display());
        tracing::debug!("{} snapshot saved to: {}", table.role, snapshot.display());

        Ok(SavedTable { current, snapshot })
    }
}

fn write_csv(table: &CorpusTable, path: &Path) -> Result<(), StorageError> {
    let columns = table.columns();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;

    for row in table.rows() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| match column.as_str() {
                PERIOD_COLUMN => row.period.map(|p| p.format("%Y-%m-%d").to_string()).unwrap_or_default(),
                FILENAME_COLUMN => row.filename.clone(),
                key => row.get(key).map(FieldValue::to_csv_field).unwrap_or_default(),
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{FieldDictionary, TableRole};

    #[test]
    fn writes_csv_and_snapshot_with_union_columns() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("output"), "fha_data").unwrap();

        let mut table = CorpusTable::new(TableRole::FourthTable);
        let mut a = FieldDictionary::new(NaiveDate::from_ymd_opt(2021, 11, 1), "FHAProdReport_Nov2021.pdf");
        a.insert("purchase_pct", FieldValue::Percent(70.0));
        let mut b = FieldDictionary::new(NaiveDate::from_ymd_opt(2021, 12, 1), "FHAProdReport_Dec2021.pdf");
        b.insert("total_endorsement_count", FieldValue::Decimal("75123".into()));
        b.insert("purchase_pct", FieldValue::Percent(71.25));
        table.push(a);
        table.push(b);

        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let saved = storage.save_table(&table, today).unwrap();

        assert!(saved.current.ends_with("fha_data_tab4.csv"));
        assert!(saved.snapshot.ends_with("fha_data_tab4_2026-10-17.bak"));

        let written = fs::read_to_string(&saved.current).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "date,filename,purchase_pct,total_endorsement_count");
        assert_eq!(lines[1], "2021-11-01,FHAProdReport_Nov2021.pdf,70.0,");
        assert_eq!(lines[2], "2021-12-01,FHAProdReport_Dec2021.pdf,71.25,75123");
        assert_eq!(fs::read_to_string(&saved.snapshot).unwrap(), written);
    }
}
