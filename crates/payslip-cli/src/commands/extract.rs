//! Extract command - extract fields from a single payslip's OCR output.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use payslip_core::PayslipParser;

use super::{extract_file, format_record, load_config, ExtractedDocument, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (OCR text dump, OCR JSON dump, or text-layer PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the JSON record as <output-dir>/<input stem>.json
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which line and rule resolved each field
    #[arg(long)]
    trace: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let parser = PayslipParser::from_config(&config)?;
    let document = extract_file(&args.input, &config.source, &parser)?;
    let outcome = &document.outcome;

    let output = format_record(&outcome.record, args.format, config.output.pretty_json)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
        let stem = args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("payslip");
        let json_path = output_dir.join(format!("{}.json", stem));

        let json = serde_json::to_string_pretty(&outcome.record)?;
        fs::write(&json_path, json)?;
        eprintln!(
            "{} Record saved to {}",
            style("✓").green(),
            json_path.display()
        );
    }

    if args.trace {
        print_trace(&document);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_trace(document: &ExtractedDocument) {
    let outcome = &document.outcome;
    eprintln!();
    eprintln!(
        "{} Resolved {} fields from {} lines in {}ms",
        style("ℹ").blue(),
        outcome.resolutions.len(),
        outcome.line_count,
        outcome.processing_time_ms
    );

    for r in &outcome.resolutions {
        let page = document.lines.page_of(r.line).map_or(0, |p| p + 1);
        eprintln!(
            "  page {:>2} line {:>3}  {:<32} {:<13} {}",
            page,
            r.line,
            r.field,
            format!("{:?}", r.tier),
            r.value
        );
    }

    if let Some(period) = &outcome.period {
        eprintln!("  period             {} (from {:?})", period.label, period.source);
    }

    let missing = outcome.missing();
    if !missing.is_empty() {
        eprintln!("{}", style("Not found:").yellow());
        for field in missing {
            eprintln!("  - {}", field);
        }
    }
}
