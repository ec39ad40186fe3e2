mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use std::process;

use commands::portfolio::{CatalogArgs, MasterplanArgs};
use commands::pro_forma::{ProFormaArgs, SummaryArgs};
use commands::scenarios::SensitivityArgs;

/// Financial model of Quartier Niederdonk Living
#[derive(Parser)]
#[command(
    name = "qnl",
    version,
    about = "Financial model of Quartier Niederdonk Living",
    long_about = "Runs the calculators behind the Quartier Niederdonk Living investment \
                  memorandum with decimal precision: site-plan portfolio aggregation with \
                  leverage, the quick pro-forma profitability model and its sensitivity grid."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List the building groups of the project
    Catalog(CatalogArgs),
    /// Aggregate selected building groups and derive loan and cashflow
    Masterplan(MasterplanArgs),
    /// Run the quick profitability model (EBT, ROI, break-even)
    ProForma(ProFormaArgs),
    /// Sweep sale price and build cost and report EBT / ROI grids
    Sensitivity(SensitivityArgs),
    /// Print the human-readable summary of a quick-model run
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.format_timestamp(None).init();
}

type CommandResult = Result<serde_json::Value, Box<dyn std::error::Error>>;

/// Run one subcommand. Plain-text commands return a JSON string value.
fn run(command: Commands) -> CommandResult {
    match command {
        Commands::Catalog(args) => commands::portfolio::run_catalog(args),
        Commands::Masterplan(args) => commands::portfolio::run_masterplan(args),
        Commands::ProForma(args) => commands::pro_forma::run_pro_forma(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Summary(args) => commands::pro_forma::run_summary(args).map(serde_json::Value::String),
        Commands::Version => Ok(serde_json::Value::String(format!(
            "qnl {}",
            env!("CARGO_PKG_VERSION")
        ))),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(serde_json::Value::String(text)) => {
            println!("{text}");
            process::exit(0);
        }
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
