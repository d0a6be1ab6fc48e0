// src/hud/client.rs
use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{header, Url};
use scraper::{Html, Selector};

use crate::hud::models::{DownloadSummary, ReportLink};
use crate::utils::error::FetchError;

pub const DEFAULT_PAGE_URL: &str = "https://www.hud.gov/hud-partners/fha-production-report";

const REQUEST_TIMEOUT_SECS: u64 = 30;
// Pause after each successful download
const DOWNLOAD_DELAY_MS: u64 = 500;

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Failed to compile LINK_SELECTOR"));

/// Creates the reqwest client used for the HUD page and its PDFs.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// Fetches the production-report page as HTML.
pub async fn fetch_page(client: &reqwest::Client, page_url: &Url) -> Result<String, FetchError> {
    tracing::info!("Fetching page: {}", page_url);

    let response = client
        .get(page_url.clone())
        .header(header::ACCEPT, "text/html,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, page_url);
        return Err(FetchError::Http(status));
    }

    let body = response.text().await?;
    tracing::debug!("Downloaded {} bytes from {}", body.len(), page_url);
    Ok(body)
}

/// Every `<a href>` ending in `.pdf`, resolved against `base_url`, in page order.
pub fn discover_report_links(html: &str, base_url: &Url) -> Vec<ReportLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for element in document.select(&LINK_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.ends_with(".pdf") {
            continue;
        }
        let url = match base_url.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Ignoring unresolvable link '{}': {}", href, e);
                continue;
            }
        };
        let filename = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();
        if filename.is_empty() {
            continue;
        }
        tracing::trace!(url = %url, "Found report link");
        links.push(ReportLink { url, filename });
    }

    links
}

async fn download_report(client: &reqwest::Client, link: &ReportLink, target: &Path) -> Result<usize, FetchError> {
    let response = client.get(link.url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status));
    }
    let bytes = response.bytes().await?;
    tokio::fs::write(target, &bytes).await?;
    Ok(bytes.len())
}

/// Downloads each link into `pdf_dir`, skipping files already present.
/// Individual failures are counted, never propagated.
pub async fn download_reports(client: &reqwest::Client, links: &[ReportLink], pdf_dir: &Path) -> DownloadSummary {
    let mut summary = DownloadSummary {
        total: links.len(),
        ..DownloadSummary::default()
    };

    for link in links {
        let target = link.target_path(pdf_dir);
        if target.exists() {
            tracing::info!("Skipping (already exists): {}", link.filename);
            summary.skipped += 1;
            continue;
        }

        tracing::info!("Downloading: {}", link.filename);
        match download_report(client, link, &target).await {
            Ok(size) => {
                summary.downloaded += 1;
                tracing::info!("Saved {} bytes to: {}", size, target.display());
                tokio::time::sleep(Duration::from_millis(DOWNLOAD_DELAY_MS)).await;
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!("Failed to download {}: {}", link.filename, e);
            }
        }
    }

    summary
}

/// Fetches the page, then downloads every report it links to.
pub async fn download_all(page_url: &str, pdf_dir: &Path) -> Result<DownloadSummary, FetchError> {
    let page_url = Url::parse(page_url).map_err(|_| FetchError::InvalidUrl(page_url.to_string()))?;
    tokio::fs::create_dir_all(pdf_dir).await?;

    let client = build_client()?;
    let html = fetch_page(&client, &page_url).await?;
    let links = discover_report_links(&html, &page_url);
    tracing::info!("Found {} PDF links", links.len());

    let summary = download_reports(&client, &links, pdf_dir).await;
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <a href="/sites/dfiles/Housing/documents/FHAProdReport_Dec2021.pdf">December 2021</a>
        <a href="https://www.hud.gov/sites/documents/prorepma2013ext20130718.pdf">May 2013</a>
        <a href="/program_offices/housing/rmra">Not a report</a>
        <a href="/docs/summary.PDF">Uppercase extension</a>
        <a>No href</a>
    </body></html>"#;

    fn page_url() -> Url {
        Url::parse(DEFAULT_PAGE_URL).unwrap()
    }

    #[test]
    fn discovers_pdf_links_and_resolves_relative_urls() {
        let links = discover_report_links(PAGE, &page_url());
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0].url.as_str(),
            "https://www.hud.gov/sites/dfiles/Housing/documents/FHAProdReport_Dec2021.pdf"
        );
        assert_eq!(links[0].filename, "FHAProdReport_Dec2021.pdf");
        assert_eq!(links[1].filename, "prorepma2013ext20130718.pdf");
    }

    #[test]
    fn existing_files_are_skipped_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let links = discover_report_links(PAGE, &page_url());
        for link in &links {
            std::fs::write(link.target_path(dir.path()), b"%PDF-1.4").unwrap();
        }

        let client = build_client().unwrap();
        let summary = tokio_test::block_on(download_reports(&client, &links, dir.path()));
        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 0,
                skipped: 2,
                failed: 0,
                total: 2,
            }
        );
    }

    #[test]
    fn rejects_invalid_page_url() {
        let dir = tempfile::tempdir().unwrap();
        let result = tokio_test::block_on(download_all("not a url", dir.path()));
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
