//! Trellis CLI - declarative tmux sessions.
//!
//! A session config names a tmux session, its root directory and an ordered
//! list of windows and panes. `trellis start <name>` compiles that config into
//! tmux commands, runs them, and attaches the terminal to the new session.
//!
//! # Workflow
//!
//! 1. `trellis new <name>` writes a starter config to `~/.trellis/<name>.yaml`
//! 2. The config is edited in `$EDITOR`
//! 3. `trellis start <name>` builds the session (or attaches if it is running)
//! 4. `trellis stop [name]` kills it again
//!
//! Core functionality (config store, layout compiler, tmux commands) is in
//! `trellis-core`.

mod cli;
mod commands;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::{
    config::{do_edit, do_list, do_new, do_rm},
    session::{StartOptions, do_show, do_start, do_stop},
};
use trellis_core::ConfigStore;

// =============================================================================
// Main Entry Point
// =============================================================================

/// Entry point for the trellis CLI.
///
/// Parses command-line arguments, sets up logging and dispatches to the
/// subcommand handler. The config directory is `--config-dir`,
/// `$TRELLIS_CONFIG_DIR`, or `~/.trellis`.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let store = config_store(cli.config_dir)?;

    match cli.command {
        Commands::New { name } => do_new(&store, &name),
        Commands::Edit { name } => do_edit(&store, &name),
        Commands::Rm { name } => do_rm(&store, &name),
        Commands::Start {
            name,
            dry_run,
            teardown_on_failure,
        } => do_start(
            &store,
            &name,
            StartOptions {
                debug: cli.debug,
                dry_run,
                teardown_on_failure,
            },
        ),
        Commands::Stop { name } => do_stop(name.as_deref()),
        Commands::List { json } => do_list(&store, json),
        Commands::Show { name } => do_show(&store, &name),
    }
}

// =============================================================================
// Path Resolution
// =============================================================================

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))
}

fn config_store(dir: Option<PathBuf>) -> Result<ConfigStore> {
    Ok(match dir {
        Some(dir) => ConfigStore::new(dir),
        None => ConfigStore::in_home(&home_dir()?),
    })
}

/// Convert absolute path to display path (replace home with ~)
fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| {
            path.strip_prefix(&home)
                .ok()
                .map(|rel| Path::new("~").join(rel).display().to_string())
        })
        .unwrap_or_else(|| path.display().to_string())
}
