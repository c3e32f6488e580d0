//! Handing the terminal over to tmux.
//!
//! Outside tmux the caller's terminal attaches to the session. Inside tmux a
//! nested attach is refused, so the current client switches instead. Either
//! way the trellis process is replaced by the tmux client and never returns on
//! success.

use std::process::Command;

use super::commands::{TMUX, TMUX_ENV};
use crate::error::Error;

/// How the terminal is brought into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachAction {
    /// `attach-session`, used from a plain terminal
    Attach,
    /// `switch-client`, used from inside a tmux client
    Switch,
}

impl AttachAction {
    /// Decide from the value of the `TMUX` marker
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some(value) if !value.is_empty() => AttachAction::Switch,
            _ => AttachAction::Attach,
        }
    }

    /// Decide from the current process environment
    pub fn detect() -> Self {
        let marker = std::env::var(TMUX_ENV).ok();
        Self::from_marker(marker.as_deref())
    }

    /// tmux subcommand for this action
    pub fn command(self) -> &'static str {
        match self {
            AttachAction::Attach => "attach-session",
            AttachAction::Switch => "switch-client",
        }
    }

    /// Arguments passed to tmux for `session`
    pub fn args(self, session: &str) -> Vec<String> {
        vec![
            "-u".to_string(),
            self.command().to_string(),
            "-t".to_string(),
            session.to_string(),
        ]
    }
}

/// Replace the current process with a tmux client showing `session`.
///
/// Only returns if the exec fails, e.g. when tmux is not on `PATH`.
#[cfg(unix)]
pub fn attach_session(session: &str) -> Error {
    use std::os::unix::process::CommandExt;

    let action = AttachAction::detect();
    tracing::debug!(session, action = action.command(), "handing terminal to tmux");

    let source = Command::new(TMUX).args(action.args(session)).exec();
    Error::Attach {
        session: session.to_string(),
        source,
    }
}

/// Without exec, run the client as a child and exit with its status.
#[cfg(not(unix))]
pub fn attach_session(session: &str) -> Error {
    let action = AttachAction::detect();
    match Command::new(TMUX).args(action.args(session)).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => Error::Attach {
            session: session.to_string(),
            source,
        },
    }
}
