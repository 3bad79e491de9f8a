mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::growth::InvestArgs;
use commands::loan::LoanArgs;
use commands::mortgage::MortgageArgs;
use commands::parse::ParseArgs;

/// Robust financial calculators with permissive input handling
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Robust financial calculators with permissive input handling",
    long_about = "A CLI for loan, mortgage, and investment calculations built on a \
                  fail-open numeric core. Amounts may be given as plain numbers or \
                  currency strings (\"$1,234.56\", \"₹10,00,000\"); malformed input \
                  degrades to zero instead of crashing."
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
    /// Amortizing loan schedule with optional extra monthly payment
    Loan(LoanArgs),
    /// Mortgage payment breakdown with escrow components and LTV
    Mortgage(MortgageArgs),
    /// Compound-growth projection for a lump sum plus monthly contributions
    Invest(InvestArgs),
    /// Normalize and validate a single raw value
    Parse(ParseArgs),
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
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Invest(args) => commands::growth::run_invest(args),
        Commands::Parse(args) => commands::parse::run_parse(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
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
