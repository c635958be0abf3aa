// SMS Ledger CLI
//
//   sms-ledger backup.xml -o ledgers --from 2024-01-01 --tz Africa/Cairo
//
// Reads an SMS backup, extracts bank transactions and writes one CSV per
// account group into the output directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sms_ledger::{load_backup, write_groups, Config, Pipeline, RunFilters, TimeZoneChoice};

#[derive(Parser, Debug)]
#[command(name = "sms-ledger", version)]
#[command(about = "Turn bank SMS notifications into categorized transaction CSVs")]
struct Cli {
    /// SMS backup XML file
    file: PathBuf,

    /// Directory for the generated CSV files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Only process messages from this exact sender (e.g. "CIB")
    #[arg(short, long)]
    sender: Option<String>,

    /// Skip messages before this date (YYYY-MM-DD)
    #[arg(short, long)]
    from: Option<String>,

    /// IANA time zone for message timestamps (defaults to the system zone)
    #[arg(long, value_name = "ZONE")]
    tz: Option<String>,

    /// JSON config with account suffixes and category rules
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let cli = Cli::parse();
    debug!(?cli, "starting");

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let zone = match cli.tz.as_deref() {
        Some(name) => TimeZoneChoice::parse(name)?,
        None => TimeZoneChoice::Local,
    };
    let filters = RunFilters::parse(cli.sender.as_deref(), cli.from.as_deref())?;

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory {}", cli.output.display()))?;

    let records = load_backup(&cli.file)?;
    info!(count = records.len(), file = %cli.file.display(), "loaded messages");

    let pipeline = Pipeline::new(&config, zone);
    let output = pipeline.run(&records, &filters);

    let written = write_groups(&output.groups, &cli.output)?;
    for file in &written {
        println!("{}", file.announcement());
    }

    for (group, count) in &output.report.per_group {
        debug!(group = %group, count, "group total");
    }

    Ok(())
}
