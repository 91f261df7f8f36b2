//! bspcfg CLI - Command-line interface for bspcfg
//!
//! Provides `bspcfg files`, `bspcfg options`, `bspcfg set-option`,
//! `bspcfg apply` and the other config commands.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bspcfg_core::{ConfigRoot, ConfigTools, FileCatalog};

#[derive(Parser)]
#[command(name = "bspcfg")]
#[command(about = "bspcfg - bspwm and desktop config editor")]
#[command(version)]
struct Cli {
    /// Config root (defaults to the user config directory, e.g. ~/.config)
    #[arg(long, global = true, env = "BSPCFG_ROOT")]
    root: Option<PathBuf>,

    /// Copy each file here before modifying it
    #[arg(long, global = true, env = "BSPCFG_BACKUP_DIR")]
    backup_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known config files by program
    Files,
    /// Print a config file
    Read {
        /// Path relative to the config root
        path: String,
    },
    /// Show bspwm options from bspwm/bspwmrc
    Options,
    /// Show sections and keys of an INI-style file
    Ini {
        /// Path relative to the config root
        path: String,
    },
    /// List editable lines of a config file
    Items {
        /// Path relative to the config root
        path: String,
    },
    /// Replace text in a config file
    Replace {
        /// Path relative to the config root
        path: String,
        /// Text to search for
        search: String,
        /// Replacement text
        replace: String,
        /// Replace at most this many occurrences
        #[arg(long)]
        limit: Option<usize>,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Set a bspwm option (bspc config <option> <value>)
    SetOption {
        /// Option name, e.g. border_width
        option: String,
        /// New value
        value: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Set a key in an INI-style file (key = value)
    SetKey {
        /// Path relative to the config root
        path: String,
        /// Key name
        key: String,
        /// New value
        value: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply an action plan (JSON file, or - for stdin)
    Apply {
        /// Plan file
        plan: String,
        /// Preview changes without applying
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn config_root(root: Option<PathBuf>) -> Result<ConfigRoot> {
    let path = match root {
        Some(path) => path,
        None => dirs::config_dir().context("Cannot find the user config directory; pass --root")?,
    };
    ConfigRoot::new(&path).with_context(|| format!("Cannot open config root {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    let root = config_root(cli.root)?;
    tracing::debug!(root = %root.path().display(), "config root");

    let mut tools = ConfigTools::new(root, FileCatalog::default());
    if let Some(dir) = cli.backup_dir {
        tools = tools.with_backup_dir(dir);
    }

    let json = cli.json;
    match cli.command {
        Commands::Files => commands::show::files(&tools, json),
        Commands::Read { path } => commands::show::read(&tools, &path, json),
        Commands::Options => commands::show::options(&tools, json),
        Commands::Ini { path } => commands::show::ini(&tools, &path, json),
        Commands::Items { path } => commands::show::items(&tools, &path, json),
        Commands::Replace {
            path,
            search,
            replace,
            limit,
            dry_run,
        } => {
            let result = tools.replace_in_file(&path, &search, &replace, limit, dry_run)?;
            commands::edit::print_result(&result, json)
        }
        Commands::SetOption {
            option,
            value,
            dry_run,
        } => {
            let result = tools.set_bspc_config(&option, &value, dry_run)?;
            commands::edit::print_result(&result, json)
        }
        Commands::SetKey {
            path,
            key,
            value,
            dry_run,
        } => {
            let result = tools.set_ini_key(&path, &key, &value, dry_run)?;
            commands::edit::print_result(&result, json)
        }
        Commands::Apply { plan, dry_run } => commands::plan::apply(&tools, &plan, dry_run, json),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
