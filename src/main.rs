use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod banner;
mod cli;
mod config;
mod link;
mod settings;
mod vault;

use config::Config;
use settings::DeviceType;

#[derive(Parser)]
#[command(name = "sbn")]
#[command(author, version, about = "Simple Banner - resolve note banners from frontmatter")]
struct Cli {
    /// Path to the vault directory
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device whose settings apply
    #[arg(long, global = true, value_enum)]
    device: Option<DeviceType>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default banner settings into the vault
    Init {
        /// Also create the global config file
        #[arg(long)]
        global_config: bool,
    },

    /// Parse a single banner value
    Parse {
        /// Value as written in frontmatter, e.g. "[[banner.png|0x-40]]"
        value: String,

        /// Note the value belongs to (enables relative links and write-back)
        #[arg(long)]
        note: Option<PathBuf>,

        /// Property to rewrite when a host link resolves
        #[arg(long)]
        property: Option<String>,

        /// Rewrite host links in the note as wikilinks
        #[arg(long)]
        apply: bool,

        /// Probe remote links for their content type
        #[arg(long)]
        probe: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a single icon value
    Icon {
        /// Value as written in frontmatter, e.g. "🦀" or "[[icon.png]]"
        value: String,

        /// Note the value belongs to
        #[arg(long)]
        note: Option<PathBuf>,

        /// Rewrite host links in the note as wikilinks
        #[arg(long)]
        apply: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the banner, icon and datetime of a note
    Banner {
        /// Note path
        note: PathBuf,

        /// Rewrite host links in the note as wikilinks
        #[arg(long)]
        apply: bool,

        /// Probe remote links for their content type
        #[arg(long)]
        probe: bool,

        /// Earlier banner value; reports whether only its options changed
        #[arg(long)]
        previous: Option<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Report banner and icon links that do not resolve
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Show the effective settings
    Settings {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Resolve vault path: flag, then config, then current directory
    let vault_path = match cli.vault.clone().or_else(|| config.vault.clone()) {
        Some(path) => path,
        None => std::env::current_dir().context("Could not determine vault path")?,
    };
    let device = cli.device.or(config.device).unwrap_or_default();

    if let Commands::Init { global_config } = cli.command {
        return cli::commands::init(&vault_path, global_config);
    }

    let workspace = cli::Workspace::open(&vault_path, config, device)?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Parse { value, note, property, apply, probe, json } => {
            let options = cli::commands::ParseOptions {
                note: note.as_deref(),
                property: property.as_deref(),
                apply,
                probe,
                json,
            };
            cli::commands::parse(&workspace, &value, options).await
        }
        Commands::Icon { value, note, apply, json } => {
            cli::commands::icon(&workspace, &value, note.as_deref(), apply, json)
        }
        Commands::Banner { note, apply, probe, previous, json } => {
            let options = cli::commands::BannerOptions {
                apply,
                probe,
                previous: previous.as_deref(),
                json,
            };
            cli::commands::banner(&workspace, &note, options).await
        }
        Commands::Check { strict } => cli::commands::check(&workspace, strict),
        Commands::Settings { json } => cli::commands::show_settings(&workspace, json),
    }
}
