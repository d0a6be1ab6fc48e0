// src/hud/models.rs
use std::path::{Path, PathBuf};

/// A production-report PDF linked from the HUD page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLink {
    pub url: reqwest::Url,
    /// Last path segment of `url`.
    pub filename: String,
}

impl ReportLink {
    /// Local path the report is saved to.
    pub fn target_path(&self, pdf_dir: &Path) -> PathBuf {
        pdf_dir.join(&self.filename)
    }
}

/// Counts reported after a download run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl DownloadSummary {
    pub fn log(&self) {
        tracing::info!("{}", "=".repeat(50));
        tracing::info!("Download Summary:");
        tracing::info!("  Downloaded: {}", self.downloaded);
        tracing::info!("  Skipped (already exists): {}", self.skipped);
        tracing::info!("  Failed: {}", self.failed);
        tracing::info!("  Total PDFs found: {}", self.total);
        tracing::info!("{}", "=".repeat(50));
    }
}
