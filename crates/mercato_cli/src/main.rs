//! `mercato-i18n`: catalog audit and language preference tool

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mercato-i18n", version, about = "Mercato language and currency tooling")]
struct Cli {
    /// Config file (standalone or with an `[i18n]` table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preference file, overrides `preference_file` from the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported languages in picker order
    Languages,

    /// Report keys missing from non-default catalogs
    Check {
        /// Exit with an error when any catalog is incomplete
        #[arg(long)]
        strict: bool,
    },

    /// Resolve a translation key
    Translate {
        /// Key id, e.g. `add_to_cart`
        key: String,

        /// Language code; defaults to the stored preference
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Print the stored language and its currency
    Get,

    /// Store a new language preference
    Set {
        /// Language code: en, fr or es
        code: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = commands::load_config(cli.config.as_deref(), cli.store)?;

    match cli.command {
        Command::Languages => commands::languages(),
        Command::Check { strict } => commands::check(strict),
        Command::Translate { key, lang } => commands::translate(config, &key, lang.as_deref()),
        Command::Get => commands::get(config),
        Command::Set { code } => commands::set(config, &code),
    }
}
