//! Fields command - show the field catalog in effect.

use clap::Args;
use console::style;

use super::load_config;

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// Print the catalog as JSON (usable as a catalog override file)
    #[arg(long)]
    json: bool,
}

pub async fn run(args: FieldsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = config.load_catalog()?;

    if args.json {
        println!("{}", catalog.to_json()?);
        return Ok(());
    }

    let width = catalog.fields().iter().map(|f| f.id.len()).max().unwrap_or(0);

    for (idx, field) in catalog.fields().iter().enumerate() {
        let offset = match field.offset {
            Some(offset) => format!("+{}", offset),
            None => format!("≤{}", config.extraction.lookahead_limit),
        };
        println!(
            "{:>3}  {:<width$}  {:>4}  {}",
            idx + 1,
            field.id,
            offset,
            style(field.aliases.join(" | ")).dim(),
            width = width
        );
    }
    println!(
        "{:>3}  {:<width$}  {:>4}  {}",
        catalog.len() + 1,
        catalog.period_field(),
        "",
        style("month/year token").dim(),
        width = width
    );

    Ok(())
}
