//! Trellis Core - Core library for the trellis session launcher
//!
//! This crate provides the core functionality for trellis including:
//! - Session configuration types and the on-disk config store
//! - The layout compiler that turns a config into tmux commands
//! - Attaching or switching the terminal into the built session

pub mod config;
pub mod error;
pub mod paths;
pub mod tmux;

// Re-export commonly used types at crate root
pub use config::{ConfigStore, SessionConfig, Window};
pub use error::{Error, Result};
pub use tmux::{AttachAction, CommandChain, Compiler, ExecuteOptions, Invocation};
