//! Batch processing command for multiple payslip files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use payslip_core::models::config::SourceConfig;
use payslip_core::{ExtractionRecord, PayslipParser};

use super::{extract_file, format_record, load_config, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV with one row per payslip
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ExtractionRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "json" | "pdf")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Workers share the parser (and its immutable catalog); each file gets its own record.
    let parser = Arc::new(PayslipParser::from_config(&config)?);
    let source_config = Arc::new(config.source.clone());

    let mut outcomes = stream::iter(files)
        .map(|path| {
            let parser = Arc::clone(&parser);
            let source_config = Arc::clone(&source_config);
            tokio::task::spawn_blocking(move || process_single_file(path, &source_config, &parser))
        })
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(joined) = outcomes.next().await {
        let result = joined?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(record) = &result.record else {
                continue;
            };
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("payslip");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_record(record, args.format, config.output.pretty_json)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: PathBuf,
    config: &SourceConfig,
    parser: &PayslipParser,
) -> ProcessResult {
    let file_start = Instant::now();
    let outcome = extract_file(&path, config, parser);
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(document) => ProcessResult {
            path,
            record: Some(document.outcome.record),
            error: None,
            processing_time_ms,
        },
        Err(e) => ProcessResult {
            path,
            record: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let Some(headers) = results
        .iter()
        .find_map(|r| r.record.as_ref())
        .map(|record| record.headers())
    else {
        wtr.write_record(["filename", "status", "processing_time_ms", "error"])?;
        for result in results {
            let time = result.processing_time_ms.to_string();
            wtr.write_record([
                file_name(&result.path),
                "error",
                time.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
        wtr.flush()?;
        return Ok(());
    };

    let mut header_row = vec![
        "filename".to_string(),
        "status".to_string(),
        "processing_time_ms".to_string(),
        "error".to_string(),
    ];
    header_row.extend(headers.iter().cloned());
    wtr.write_record(&header_row)?;

    for result in results {
        let mut row = vec![
            file_name(&result.path).to_string(),
            if result.record.is_some() { "success" } else { "error" }.to_string(),
            result.processing_time_ms.to_string(),
            result.error.clone().unwrap_or_default(),
        ];
        match &result.record {
            Some(record) => row.extend(record.to_row()),
            None => row.extend(std::iter::repeat_n(String::new(), headers.len())),
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}
