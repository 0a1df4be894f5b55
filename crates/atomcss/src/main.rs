//! atomcss CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::resolve::{ResolveArgs, ResolveFormat};
use commands::rules::RulesArgs;
use commands::theme::{ThemeArgs, ThemeFormat};

#[derive(Parser)]
#[command(name = "atomcss")]
#[command(version, about = "Resolve atomic CSS utility tokens", long_about = None)]
struct Cli {
    /// Config file (JSON or YAML); defaults to the mini preset
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve utility tokens to CSS
    Resolve {
        /// Tokens to resolve (read from stdin when omitted)
        tokens: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: ResolveFormat,

        /// Report every matching rule, not only the winner (always JSON)
        #[arg(long, conflicts_with = "format")]
        all: bool,

        /// Exit with an error if any token is unmatched
        #[arg(long)]
        strict: bool,
    },

    /// Print the merged theme or one value of it
    Theme {
        /// Dotted path, e.g. colors.red.500
        path: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: ThemeFormat,
    },

    /// List registered rules in precedence order
    Rules,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atomcss=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            tokens,
            format,
            all,
            strict,
        } => commands::resolve::execute(ResolveArgs {
            tokens,
            config: cli.config,
            format,
            all,
            strict,
        }),
        Commands::Theme { path, format } => commands::theme::execute(ThemeArgs {
            path,
            config: cli.config,
            format,
        }),
        Commands::Rules => commands::rules::execute(RulesArgs { config: cli.config }),
    }
}
