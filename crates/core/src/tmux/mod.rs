//! Tmux session management for trellis.
//!
//! # Submodules
//!
//! - [`chain`]: Ordered, fail-fast execution of queued commands
//! - [`commands`]: Low-level tmux command builders (NewSession, SplitWindow, etc.)
//! - [`layout`]: The layout compiler turning a session config into a chain
//! - [`attach`]: Attach/switch decision and the final process hand-off
//!
//! # Usage
//!
//! ```ignore
//! use trellis_core::tmux::{Compiler, ExecuteOptions};
//!
//! let compiler = Compiler::from_env()?;
//! let err = compiler.execute(&config, ExecuteOptions::default()).unwrap_err();
//! ```

mod attach;
mod chain;
mod commands;
mod layout;

pub use attach::*;
pub use chain::*;
pub use commands::*;
pub use layout::*;
