use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Build tmux sessions from declarative layouts")]
#[command(version)]
pub struct Cli {
    /// Directory holding session configs (default: ~/.trellis)
    #[arg(
        long = "config-dir",
        value_name = "DIR",
        env = "TRELLIS_CONFIG_DIR",
        global = true
    )]
    pub config_dir: Option<PathBuf>,

    /// Log every tmux command before it runs
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a session config from the starter template and open it
    New {
        /// Name of the session
        name: String,
    },

    /// Open a session config in $EDITOR
    Edit {
        /// Name of the session
        name: String,
    },

    /// Delete a session config
    #[command(visible_alias = "delete")]
    Rm {
        /// Name of the session
        name: String,
    },

    /// Build a session from its config and attach to it
    #[command(visible_alias = "s")]
    Start {
        /// Name of the session
        name: String,

        /// Print the tmux commands instead of running them
        #[arg(long = "dry-run")]
        dry_run: bool,

        /// Kill the session again if building it fails halfway
        #[arg(long = "teardown-on-failure")]
        teardown_on_failure: bool,
    },

    /// Kill a tmux session (uses current tmux session if no name given)
    Stop {
        /// Name of the session
        name: Option<String>,
    },

    /// List stored session configs
    #[command(visible_alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the tmux commands a config compiles to
    Show {
        /// Name of the session
        name: String,
    },
}
