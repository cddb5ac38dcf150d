mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use wc_sequence::StoreConfig;

#[derive(Parser)]
#[command(name = "wc-inspect", about = "Inspect a wc-sequence store file")]
struct Cli {
    /// SQLite store file. Falls back to $WC_STORE_PATH.
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Kind {
    Pairings,
    Sessions,
}

#[derive(Subcommand)]
enum Command {
    /// Print every live sequence as one JSON line each.
    List {
        #[arg(value_enum)]
        kind: Kind,
    },

    /// Print one live sequence.
    Get {
        #[arg(value_enum)]
        kind: Kind,
        topic: String,
    },

    /// Delete a sequence, expired or not.
    Delete {
        #[arg(value_enum)]
        kind: Kind,
        topic: String,
    },

    /// Evict every expired pairing and session and print their topics.
    Purge,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = StoreConfig::new();
    if let Some(db) = cli.db {
        config = config.path(Some(db));
    }
    let Some(path) = config.store_path() else {
        anyhow::bail!("no store file: pass --db or set {}", wc_sequence::config::STORE_PATH_ENV);
    };
    if !path.exists() {
        anyhow::bail!("store file {:?} doesn't exist", path);
    }

    match cli.command {
        Command::List { kind } => commands::list(&config, kind)?,
        Command::Get { kind, topic } => commands::get(&config, kind, &topic)?,
        Command::Delete { kind, topic } => commands::delete(&config, kind, &topic)?,
        Command::Purge => commands::purge(&config)?,
    }

    Ok(())
}
