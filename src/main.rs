// src/main.rs
mod extractors;
mod hud;
mod pipeline;
mod storage;
mod tables;
mod utils;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use extractors::ExtractOptions;
use pipeline::{extract_corpus, DocumentProcessor};
use storage::StorageManager;
use tables::{SidecarSource, TableSource, TabulaCli};
use utils::AppError;

/// Downloads FHA production reports and extracts their tables to CSV
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download every report PDF linked from the HUD production-report page
    Download {
        /// Directory the PDFs are saved to
        #[arg(long, env = "FHA_PDF_DIR", default_value = "./pdf")]
        pdf_dir: PathBuf,

        /// Page listing the reports
        #[arg(long, default_value = hud::DEFAULT_PAGE_URL)]
        page_url: String,
    },

    /// Extract Tables 1, 3 and 4 from every PDF into CSV files
    Extract {
        /// Directory containing the report PDFs
        #[arg(long, env = "FHA_PDF_DIR", default_value = "./pdf")]
        pdf_dir: PathBuf,

        /// Output directory for the CSV files
        #[arg(short, long, env = "FHA_OUTPUT_DIR", default_value = "./output")]
        output_dir: PathBuf,

        /// File name prefix for the CSV files
        #[arg(long, default_value = "fha_data")]
        output_prefix: String,

        /// Where the tables come from
        #[arg(long, value_enum, default_value_t = TablesFrom::Tabula)]
        tables_from: TablesFrom,

        /// Path to the tabula-java jar
        #[arg(long, env = "TABULA_JAR")]
        tabula_jar: Option<PathBuf>,

        /// Java executable used to run tabula
        #[arg(long, env = "JAVA_BIN", default_value = "java")]
        java: String,

        /// Keep zero-valued counts and percentages
        #[arg(long)]
        keep_zero_values: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TablesFrom {
    /// Run tabula-java on each PDF
    Tabula,
    /// Read pre-rendered `<stem>.guess.json` / `<stem>.stream.json` files
    Sidecar,
}

fn table_source(
    tables_from: TablesFrom,
    tabula_jar: Option<PathBuf>,
    java: String,
) -> Result<Box<dyn TableSource>, AppError> {
    match tables_from {
        TablesFrom::Sidecar => Ok(Box::new(SidecarSource)),
        TablesFrom::Tabula => {
            let jar = tabula_jar.ok_or_else(|| {
                AppError::Config("--tabula-jar (or TABULA_JAR) is required with --tables-from tabula".to_string())
            })?;
            if !jar.is_file() {
                return Err(AppError::Config(format!("Tabula jar '{}' not found", jar.display())));
            }
            Ok(Box::new(TabulaCli::new(java, jar)))
        }
    }
}

fn run_extract(
    pdf_dir: &Path,
    output_dir: &Path,
    output_prefix: String,
    source: &dyn TableSource,
    options: ExtractOptions,
) -> Result<(), AppError> {
    let processor = DocumentProcessor::new(source, options);
    let corpus = extract_corpus(pdf_dir, &processor)?;

    let storage = StorageManager::new(output_dir, output_prefix)?;
    let today = chrono::Local::now().date_naive();
    for table in corpus.tables.values() {
        if table.is_empty() {
            tracing::warn!("No {} data extracted, nothing written", table.role);
            continue;
        }
        storage.save_table(table, today)?;
    }

    corpus.log_summary();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // RUST_LOG overrides --verbose
    utils::logging::setup_logging(args.verbose);
    tracing::debug!("Starting with args: {:?}", args);

    match args.command {
        Command::Download { pdf_dir, page_url } => {
            let summary = hud::download_all(&page_url, &pdf_dir).await?;
            if summary.failed > 0 {
                tracing::warn!("{} of {} downloads failed", summary.failed, summary.total);
            }
        }
        Command::Extract {
            pdf_dir,
            output_dir,
            output_prefix,
            tables_from,
            tabula_jar,
            java,
            keep_zero_values,
        } => {
            let source = table_source(tables_from, tabula_jar, java)?;
            let options = ExtractOptions { keep_zero_values };

            // tabula runs as a blocking subprocess per rendering
            tokio::task::block_in_place(|| {
                run_extract(&pdf_dir, &output_dir, output_prefix, source.as_ref(), options)
            })?;
        }
    }

    Ok(())
}
