//! Low-level tmux command wrappers
//!
//! Builders render tmux argv as an [`Invocation`] so the layout compiler can
//! queue them on a [`CommandChain`](super::CommandChain). Session queries used
//! by the CLI run tmux directly.

use std::process::{Command, Output, Stdio};

use super::chain::Invocation;
use crate::error::{Error, Result};

/// tmux executable name
pub const TMUX: &str = "tmux";

/// Environment variable tmux sets inside its clients
pub const TMUX_ENV: &str = "TMUX";

/// Layout used when a window does not name one
pub const DEFAULT_LAYOUT: &str = "tiled";

/// Execute a tmux command and return the output
fn tmux(args: &[&str]) -> Result<Output> {
    Ok(Command::new(TMUX).args(args).output()?)
}

/// Execute a tmux command and check if it succeeded (suppressing stderr)
fn tmux_status(args: &[&str]) -> Result<bool> {
    Ok(Command::new(TMUX)
        .args(args)
        .stderr(Stdio::null())
        .status()?
        .success())
}

/// Build an invocation of tmux
fn tmux_invocation(args: Vec<&str>) -> Invocation {
    Invocation::new(TMUX, args)
}

// =============================================================================
// Session Commands
// =============================================================================

/// Check if we're currently inside a tmux session
pub fn in_tmux() -> bool {
    std::env::var(TMUX_ENV).is_ok_and(|v| !v.is_empty())
}

/// Get the current tmux session name (if inside tmux)
pub fn current_session() -> Result<String> {
    if !in_tmux() {
        return Err(Error::NotInTmux);
    }
    let output = tmux(&["display-message", "-p", "#S"])?;
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || name.is_empty() {
        return Err(Error::NotInTmux);
    }
    Ok(name)
}

/// Check if a tmux session exists
pub fn has_session(name: &str) -> bool {
    tmux_status(&["has-session", "-t", name]).unwrap_or(false)
}

/// Kill a tmux session
pub fn kill_session(name: &str) -> Result<()> {
    let invocation = kill_session_invocation(name);
    let mut chain = super::CommandChain::new();
    chain.add(invocation);
    chain.run()
}

pub fn kill_session_invocation(name: &str) -> Invocation {
    tmux_invocation(vec!["kill-session", "-t", name])
}

pub fn start_server() -> Invocation {
    tmux_invocation(vec!["start-server"])
}

/// Builder for creating new tmux sessions
#[derive(Default)]
pub struct NewSession<'a> {
    name: Option<&'a str>,
    detached: bool,
    start_dir: Option<&'a str>,
    window_name: Option<&'a str>,
}

impl<'a> NewSession<'a> {
    /// Create a new session builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session name
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Start the session detached
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Set the starting directory
    pub fn start_directory(mut self, dir: &'a str) -> Self {
        self.start_dir = Some(dir);
        self
    }

    /// Set the initial window name
    pub fn window_name(mut self, name: &'a str) -> Self {
        self.window_name = Some(name);
        self
    }

    pub fn build(self) -> Invocation {
        let mut args = vec!["new-session"];

        if self.detached {
            args.push("-d");
        }

        if let Some(name) = self.name {
            args.push("-s");
            args.push(name);
        }

        if let Some(name) = self.window_name {
            args.push("-n");
            args.push(name);
        }

        if let Some(dir) = self.start_dir {
            args.push("-c");
            args.push(dir);
        }

        tmux_invocation(args)
    }
}

// =============================================================================
// Window Commands
// =============================================================================

/// Builder for new-window
#[derive(Default)]
pub struct NewWindow<'a> {
    target: Option<&'a str>,
    name: Option<&'a str>,
    start_dir: Option<&'a str>,
}

impl<'a> NewWindow<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target window index (`session:index`)
    pub fn target(mut self, target: &'a str) -> Self {
        self.target = Some(target);
        self
    }

    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn start_directory(mut self, dir: &'a str) -> Self {
        self.start_dir = Some(dir);
        self
    }

    pub fn build(self) -> Invocation {
        let mut args = vec!["new-window"];

        if let Some(target) = self.target {
            args.push("-t");
            args.push(target);
        }

        if let Some(name) = self.name {
            args.push("-n");
            args.push(name);
        }

        if let Some(dir) = self.start_dir {
            args.push("-c");
            args.push(dir);
        }

        tmux_invocation(args)
    }
}

/// Apply a layout to a window
pub fn select_layout(target: &str, layout: &str) -> Invocation {
    tmux_invocation(vec!["select-layout", "-t", target, layout])
}

/// Focus a window
pub fn select_window(target: &str) -> Invocation {
    tmux_invocation(vec!["select-window", "-t", target])
}

// =============================================================================
// Pane Commands
// =============================================================================

/// Builder for splitting windows
#[derive(Default)]
pub struct SplitWindow<'a> {
    target: Option<&'a str>,
    start_dir: Option<&'a str>,
}

impl<'a> SplitWindow<'a> {
    /// Create a new split window builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target window or pane
    pub fn target(mut self, target: &'a str) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the starting directory
    pub fn start_directory(mut self, dir: &'a str) -> Self {
        self.start_dir = Some(dir);
        self
    }

    pub fn build(self) -> Invocation {
        let mut args = vec!["split-window"];

        if let Some(target) = self.target {
            args.push("-t");
            args.push(target);
        }

        if let Some(dir) = self.start_dir {
            args.push("-c");
            args.push(dir);
        }

        tmux_invocation(args)
    }
}

/// Focus a pane
pub fn select_pane(target: &str) -> Invocation {
    tmux_invocation(vec!["select-pane", "-t", target])
}

/// Type text into a pane and press Enter
pub fn send_keys(target: &str, keys: &str) -> Invocation {
    tmux_invocation(vec!["send-keys", "-t", target, keys, "Enter"])
}
