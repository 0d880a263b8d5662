//! CLI application for payslip OCR field extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, export, extract, fields};

/// Payslip OCR - Extract employee and payroll fields from recognized payslip text
#[derive(Parser)]
#[command(name = "payslip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv every OCR line)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from a single payslip
    Extract(extract::ExtractArgs),

    /// Extract fields from many payslips
    Batch(batch::BatchArgs),

    /// Append extracted records to a CSV sheet
    Export(export::ExportArgs),

    /// List the field catalog
    Fields(fields::FieldsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Export(args) => export::run(args, config_path).await,
        Commands::Fields(args) => fields::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
