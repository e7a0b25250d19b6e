mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

use commands::sensitivity::SensitivityArgs;
use commands::valuation::ValueArgs;
use crate::config::DcfConfig;

/// Discounted cash flow intrinsic valuation
#[derive(Parser)]
#[command(
    name = "dcf",
    version,
    about = "Discounted cash flow intrinsic valuation",
    long_about = "Estimate a company's intrinsic value from its free cash flow, growth rate, \
                  WACC, projection horizon and terminal growth rate. Rates are fractions \
                  (0.05 = 5%) on the command line and percentages in interactive mode."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (default: chart for interactive, table otherwise)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// TOML file with default inputs and sensitivity ranges
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a discounted cash flow valuation
    Value(ValueArgs),
    /// Intrinsic value across WACC x terminal growth
    Sensitivity(SensitivityArgs),
    /// Prompt for inputs and chart the result
    Interactive,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Chart,
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match DcfConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let default_format = match cli.command {
        Commands::Interactive => OutputFormat::Chart,
        _ => OutputFormat::Table,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Value(args) => commands::valuation::run_value(args, &config),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args, &config),
        Commands::Interactive => commands::interactive::run_interactive(&config),
        Commands::Version => {
            println!("dcf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output.unwrap_or(default_format), &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
