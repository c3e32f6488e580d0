//! Ordered, fail-fast execution of external commands

use std::{fmt, process::Command};

use crate::error::{Error, Result};

/// A single argv-style command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Spawn the process and wait for it to finish
    fn run(&self, index: usize) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| Error::Spawn {
                index,
                command: self.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                index,
                command: self.to_string(),
                status,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Commands run one after another, stopping at the first failure
#[derive(Debug, Default)]
pub struct CommandChain {
    entries: Vec<Invocation>,
    debug: bool,
}

impl CommandChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log each command before it runs
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn add(&mut self, invocation: Invocation) {
        self.entries.push(invocation);
    }

    pub fn entries(&self) -> &[Invocation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Execute every entry in order.
    ///
    /// Returns the first spawn failure or non-zero exit. Entries that already
    /// ran are not undone.
    pub fn run(self) -> Result<()> {
        for (index, invocation) in self.entries.iter().enumerate() {
            if self.debug {
                tracing::debug!(step = index, "executing: {}", invocation);
            }
            invocation.run(index)?;
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", ["-c", script])
    }

    #[test]
    fn test_display_renders_argv() {
        let inv = Invocation::new("tmux", ["send-keys", "-t", "demo:0.0", "vim", "Enter"]);
        assert_eq!(inv.to_string(), "tmux send-keys -t demo:0.0 vim Enter");
    }

    #[test]
    fn test_runs_entries_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let log = temp.path().join("log");
        let log = log.to_str().unwrap();

        let mut chain = CommandChain::new().debug(true);
        chain.add(sh(&format!("echo one >> {}", log)));
        chain.add(sh(&format!("echo two >> {}", log)));
        chain.add(sh(&format!("echo three >> {}", log)));
        chain.run().unwrap();

        let content = std::fs::read_to_string(log).unwrap();
        assert_eq!(content, "one\ntwo\nthree\n");
    }

    #[test]
    fn test_stops_at_first_failure() {
        let temp = tempfile::tempdir().unwrap();
        let marker = temp.path().join("ran");

        let mut chain = CommandChain::new();
        chain.add(Invocation::new("true", Vec::<String>::new()));
        chain.add(sh("exit 3"));
        chain.add(sh(&format!("touch {}", marker.display())));

        let err = chain.run().unwrap_err();
        assert_eq!(err.failed_step(), Some(1));
        match err {
            Error::CommandFailed { command, status, .. } => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!marker.exists());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut chain = CommandChain::new();
        chain.add(Invocation::new("trellis-no-such-program", ["x"]));

        let err = chain.run().unwrap_err();
        assert!(matches!(err, Error::Spawn { index: 0, .. }));
    }

    #[test]
    fn test_empty_chain_succeeds() {
        let chain = CommandChain::new();
        assert!(chain.is_empty());
        chain.run().unwrap();
    }
}
