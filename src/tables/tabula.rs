// src/tables/tabula.rs
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::tables::model::{ExtractedTable, LayoutMode};
use crate::tables::TableSource;
use crate::utils::error::TableSourceError;

/// One table in tabula's `--format JSON` output. Geometry fields are ignored.
#[derive(Debug, Deserialize)]
struct TabulaTable {
    #[serde(default)]
    extraction_method: Option<String>,
    #[serde(default)]
    data: Vec<Vec<TabulaCell>>,
}

#[derive(Debug, Deserialize)]
struct TabulaCell {
    #[serde(default)]
    text: String,
}

/// Parses tabula JSON into tables. Blank cells become absent cells.
pub fn parse_tabula_json(json: &str) -> Result<Vec<ExtractedTable>, TableSourceError> {
    let raw: Vec<TabulaTable> = serde_json::from_str(json)?;
    let tables = raw
        .into_iter()
        .map(|table| {
            tracing::trace!(
                "tabula table via {:?} with {} rows",
                table.extraction_method,
                table.data.len()
            );
            ExtractedTable::new(
                table
                    .data
                    .into_iter()
                    .map(|row| row.into_iter().map(|cell| Some(cell.text)).collect())
                    .collect(),
            )
        })
        .collect();
    Ok(tables)
}

/// Decodes extractor output as UTF-8, falling back to Latin-1 byte mapping.
fn decode_output(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("tabula output is not UTF-8 ({}), decoding as Latin-1", err.utf8_error());
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Runs the tabula-java jar as a blocking subprocess for every rendering.
#[derive(Debug, Clone)]
pub struct TabulaCli {
    java: String,
    jar: PathBuf,
}

impl TabulaCli {
    pub fn new(java: impl Into<String>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
        }
    }

    fn command(&self, pdf: &Path, mode: LayoutMode) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-Dfile.encoding=UTF-8")
            .arg("-jar")
            .arg(&self.jar)
            .args(["--pages", "all", "--format", "JSON", "--silent"])
            .args(mode.tabula_flags())
            .arg(pdf);
        cmd
    }
}

impl TableSource for TabulaCli {
    fn read_tables(&self, pdf: &Path, mode: LayoutMode) -> Result<Vec<ExtractedTable>, TableSourceError> {
        tracing::debug!("Running tabula ({}) on {}", mode, pdf.display());
        let output = self
            .command(pdf, mode)
            .output()
            .map_err(|source| TableSourceError::Spawn {
                program: self.java.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TableSourceError::ExitStatus {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_tabula_json(&decode_output(output.stdout))
    }
}

/// Reads tabula JSON rendered ahead of time next to each PDF, as
/// `<stem>.guess.json` and `<stem>.stream.json`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSource;

impl SidecarSource {
    pub fn sidecar_path(pdf: &Path, mode: LayoutMode) -> PathBuf {
        let stem = pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        pdf.with_file_name(format!("{}.{}.json", stem, mode.as_str()))
    }
}

impl TableSource for SidecarSource {
    fn read_tables(&self, pdf: &Path, mode: LayoutMode) -> Result<Vec<ExtractedTable>, TableSourceError> {
        let path = Self::sidecar_path(pdf, mode);
        let bytes = std::fs::read(&path).map_err(|source| TableSourceError::Io {
            path: path.clone(),
            source,
        })?;
        parse_tabula_json(&decode_output(bytes))
    }
}
