mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::AnalyzeArgs;
use commands::fiscal::{MortgageArgs, StampDutyArgs, TdsrArgs};
use commands::market::MarketArgs;

/// True-cost analysis for Singapore residential property purchases
#[derive(Parser)]
#[command(
    name = "pda",
    version,
    about = "True-cost analysis for Singapore residential property purchases",
    long_about = "Computes statutory stamp duties, LTV-constrained financing and monthly \
                  holding costs for a property listing, and rates the asking price \
                  against comparable transactions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full acquisition and holding cost analysis for a listing
    Analyze(AnalyzeArgs),
    /// Rate a target price against comparable transactions
    Market(MarketArgs),
    /// Progressive buyer's stamp duty with tier breakdown
    StampDuty(StampDutyArgs),
    /// Amortized monthly mortgage payment
    Mortgage(MortgageArgs),
    /// Debt servicing ratio and loan qualification
    Tdsr(TdsrArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::deal::run_analyze(args),
        Commands::Market(args) => commands::market::run_market(args),
        Commands::StampDuty(args) => commands::fiscal::run_stamp_duty(args),
        Commands::Mortgage(args) => commands::fiscal::run_mortgage(args),
        Commands::Tdsr(args) => commands::fiscal::run_tdsr(args),
        Commands::Version => {
            println!("pda {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
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
