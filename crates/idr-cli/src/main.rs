mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::project::{PaymentArgs, ProjectArgs};
use commands::pslf::PslfArgs;

/// Income-driven student-loan repayment projections
#[derive(Parser)]
#[command(
    name = "idr",
    version,
    about = "Income-driven student-loan repayment projections",
    long_about = "A CLI for projecting federal student-loan repayment with decimal \
                  precision. Simulates every income-driven plan month by month, \
                  estimates tax on forgiven balances, recommends the cheapest plan \
                  by net cost, and tracks PSLF progress."
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
    /// Project every repayment plan and recommend the cheapest by net cost
    Project(ProjectArgs),
    /// Quote the first-month payment under a single plan
    Payment(PaymentArgs),
    /// Project Public Service Loan Forgiveness progress
    Pslf(PslfArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::project::run_project(args),
        Commands::Payment(args) => commands::project::run_payment(args),
        Commands::Pslf(args) => commands::pslf::run_pslf(args),
        Commands::Version => {
            println!("idr {}", env!("CARGO_PKG_VERSION"));
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
