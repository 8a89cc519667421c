use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use toggl_report_util::{
    helpers::export, logger, PdfTextSource, ReportConfig, ReportService,
};

#[derive(Debug, Parser)]
#[command(name = "toggl-report")]
#[command(about = "Summarize Toggl PDF reports into a CSV of billable hours")]
struct Cli {
    /// PDF reports, or directories containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// CSV file to write (defaults to the configured output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep one row per report instead of combining periods by month
    #[arg(long)]
    no_combine: bool,

    /// Print the CSV to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Print a per-row summary of hours
    #[arg(long)]
    summary: bool,

    /// Print rows as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);
    debug!("CLI arguments: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };
    if cli.no_combine {
        config.combine_by_month = false;
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }

    let mut service = ReportService::new(PdfTextSource, config);
    let outcome = service.process_inputs(&cli.inputs);

    for e in &outcome.errors {
        eprintln!("{}", e);
    }

    if service.aggregates().is_empty() {
        bail!("no reports could be parsed from the given inputs");
    }

    if cli.summary {
        print!("{}", export::render_summary(service.aggregates()));
    }

    if cli.json {
        println!(
            "{}",
            export::to_json(service.aggregates()).context("failed to serialize rows")?
        );
    }

    if cli.stdout {
        print!("{}", service.to_csv()?);
    } else {
        let path = service.export_csv(None)?;
        info!("CSV saved to {}", path.display());
    }

    Ok(())
}
