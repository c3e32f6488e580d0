//! Error types for trellis-core

use std::path::PathBuf;

/// Errors produced while loading, compiling and launching a session
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not find config: {0}")]
    ConfigNotFound(String),

    #[error("Config already exists: {0}")]
    ConfigExists(String),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Could not determine home directory")]
    HomeDir,

    // === Precondition Errors ===
    #[error("Could not resolve root {path}: {source}")]
    ResolveRoot {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not change directory to {}: {source}", .path.display())]
    ChangeDir {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Execution Errors ===
    #[error("Failed to launch `{command}` (step {index}): {source}")]
    Spawn {
        index: usize,
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed (step {index}): {status}")]
    CommandFailed {
        index: usize,
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("Could not attach to session {session}: {source}")]
    Attach {
        session: String,
        source: std::io::Error,
    },

    #[error("Not inside a tmux session")]
    NotInTmux,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Index of the chain entry that failed, for execution errors
    pub fn failed_step(&self) -> Option<usize> {
        match self {
            Error::Spawn { index, .. } | Error::CommandFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result alias for trellis-core operations
pub type Result<T> = std::result::Result<T, Error>;
