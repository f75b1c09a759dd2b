//! Bankfold CLI - account totals from an open-banking provider

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::report::ReportFormat;
use commands::{accounts, cards, info, movements, providers, report, setup, GlobalOpts};

/// Bankfold - per-account expenses, credits and balances from your bank
#[derive(Parser)]
#[command(name = "bankfold", version, about, long_about = None)]
struct Cli {
    /// Use offline demo data instead of the provider
    #[arg(long, global = true)]
    demo: bool,

    /// Prompt for the bank password instead of reading BANKFOLD_PASSWORD
    #[arg(long, global = true)]
    ask_password: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, fetch every account and card, and print per-account totals
    Report {
        /// First day of the window (DD/MM/YYYY, default 1 May)
        #[arg(long)]
        from: Option<String>,
        /// Last day of the window (DD/MM/YYYY, default today)
        #[arg(long)]
        to: Option<String>,
        /// Only compute a balance for accounts with both debits and credits
        #[arg(long)]
        strict_balance: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// List bank accounts
    Accounts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List credit cards
    Cards {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the logged-in user
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List banks available through the provider
    Providers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show movements of one account or card
    Movements {
        /// Account or card number
        number: String,
        /// Treat the number as a credit card
        #[arg(long)]
        card: bool,
        /// Currency to query (default: the account's own, else USD)
        #[arg(long)]
        currency: Option<String>,
        /// First day of the window (DD/MM/YYYY)
        #[arg(long)]
        from: Option<String>,
        /// Last day of the window (DD/MM/YYYY)
        #[arg(long)]
        to: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save connection settings
    Setup {
        /// Provider base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Bank provider code
        #[arg(long)]
        provider: Option<String>,
        /// Bank username
        #[arg(long)]
        username: Option<String>,
        /// Persist demo mode on or off
        #[arg(long)]
        demo_mode: Option<bool>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by RUST_LOG
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "bankfold=warn".into()))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOpts {
        demo: cli.demo,
        ask_password: cli.ask_password,
    };

    match cli.command {
        Commands::Report { from, to, strict_balance, format } => {
            report::run(opts, from, to, strict_balance, format)
        }
        Commands::Accounts { json } => accounts::run(opts, json),
        Commands::Cards { json } => cards::run(opts, json),
        Commands::Info { json } => info::run(opts, json),
        Commands::Providers { json } => providers::run(opts, json),
        Commands::Movements { number, card, currency, from, to, json } => {
            movements::run(opts, &number, card, currency, from, to, json)
        }
        Commands::Setup { base_url, provider, username, demo_mode } => {
            setup::run(base_url, provider, username, demo_mode)
        }
    }
}
