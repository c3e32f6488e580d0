//! Session layout compiler.
//!
//! Turns a [`SessionConfig`] into the ordered tmux commands that rebuild its
//! windows and panes.
//!
//! # Addressing
//!
//! Windows are targeted as `session:i` and panes as `session:i.j`, both
//! zero-based. `new-session` already creates window 0 with pane 0, so the
//! first window gets no `new-window` and the first pane of every window gets
//! no `split-window`.
//!
//! # Ordering
//!
//! - `start-server`, then `new-session`
//! - per window: `new-window` (except the first), then per pane a split
//!   (except the first) followed by the pre-window and pane commands
//! - `select-layout` once all of a window's panes exist
//! - `select-window` and `select-pane` for the startup target last

use std::{
    convert::Infallible,
    path::{Path, PathBuf},
};

use super::{
    attach::attach_session,
    chain::CommandChain,
    commands::{
        DEFAULT_LAYOUT, NewSession, NewWindow, SplitWindow, kill_session_invocation,
        select_layout, select_pane, select_window, send_keys, start_server,
    },
};
use crate::{
    config::{SessionConfig, Window},
    error::{Error, Result},
    paths::{escape_path, expand_path_with, home_dir},
};

/// Chain index of the `new-session` command
const NEW_SESSION_STEP: usize = 1;

/// Options for [`Compiler::execute`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Log each tmux command before it runs
    pub debug: bool,
    /// Kill the half-built session if a later command fails
    pub teardown_on_failure: bool,
}

/// Compiles session configs against an explicit home directory
#[derive(Debug, Clone)]
pub struct Compiler {
    home: PathBuf,
}

impl Compiler {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Compiler using the current user's home directory
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(home_dir()?))
    }

    /// Expand `~/` and make the session root absolute
    pub fn resolve_root(&self, root: &str) -> Result<PathBuf> {
        let expanded = expand_path_with(root, &self.home);
        std::path::absolute(&expanded).map_err(|source| Error::ResolveRoot {
            path: root.to_string(),
            source,
        })
    }

    /// Build the command chain for `config` without running anything
    pub fn compile(&self, config: &SessionConfig) -> Result<CommandChain> {
        config.validate()?;
        let root = self.resolve_root(&config.root)?;
        Ok(self.build_chain(config, &root))
    }

    /// Compile, run and attach.
    ///
    /// Changes the process working directory to the session root first. Only
    /// returns on failure; on success the process becomes the tmux client.
    pub fn execute(&self, config: &SessionConfig, options: ExecuteOptions) -> Result<Infallible> {
        config.validate()?;
        let root = self.resolve_root(&config.root)?;
        std::env::set_current_dir(&root).map_err(|source| Error::ChangeDir {
            path: root.clone(),
            source,
        })?;

        let chain = self.build_chain(config, &root).debug(options.debug);
        if let Err(err) = chain.run() {
            if options.teardown_on_failure {
                teardown(&config.name, &err);
            }
            return Err(err);
        }

        Err(attach_session(&config.name))
    }

    fn window_root(&self, window: &Window, session_root: &Path) -> String {
        match &window.root {
            Some(root) => expand_path_with(root, &self.home),
            None => session_root.to_string_lossy().into_owned(),
        }
    }

    fn build_chain(&self, config: &SessionConfig, root: &Path) -> CommandChain {
        let mut chain = CommandChain::new();
        let session = config.name.as_str();

        let first_window = &config.windows[0];
        let first_root = self.window_root(first_window, root);

        chain.add(start_server());
        chain.add(
            NewSession::new()
                .detached()
                .name(session)
                .window_name(&first_window.name)
                .start_directory(&first_root)
                .build(),
        );

        for (window_idx, window) in config.windows.iter().enumerate() {
            let window_id = format!("{}:{}", session, window_idx);
            let window_root = escape_path(&self.window_root(window, root));

            if window_idx != 0 {
                chain.add(
                    NewWindow::new()
                        .target(&window_id)
                        .name(&window.name)
                        .start_directory(&window_root)
                        .build(),
                );
            }

            for (pane_idx, pane) in window.panes.iter().enumerate() {
                let pane_id = format!("{}.{}", window_id, pane_idx);

                if pane_idx != 0 {
                    chain.add(
                        SplitWindow::new()
                            .target(&window_id)
                            .start_directory(&window_root)
                            .build(),
                    );
                }

                if let Some(pre_window) = config.pre_window.as_deref().filter(|c| !c.is_empty()) {
                    chain.add(send_keys(&pane_id, pre_window));
                }

                if !pane.is_empty() {
                    chain.add(send_keys(&pane_id, pane));
                }
            }

            let layout = window.layout.as_deref().unwrap_or(DEFAULT_LAYOUT);
            chain.add(select_layout(&window_id, layout));
        }

        let startup_window = format!(
            "{}:{}",
            session,
            config.startup_window.as_deref().unwrap_or("0")
        );
        let startup_pane = format!("{}.{}", startup_window, config.startup_pane.unwrap_or(0));
        chain.add(select_window(&startup_window));
        chain.add(select_pane(&startup_pane));

        chain
    }
}

/// Best-effort removal of a session left half-built by a failed chain
fn teardown(session: &str, err: &Error) {
    let created = err.failed_step().is_some_and(|step| step > NEW_SESSION_STEP);
    if !created {
        return;
    }

    let mut chain = CommandChain::new();
    chain.add(kill_session_invocation(session));
    match chain.run() {
        Ok(()) => tracing::info!(session, "removed partially built session"),
        Err(e) => tracing::warn!(session, error = %e, "could not remove partially built session"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler() -> Compiler {
        Compiler::new("/home/u")
    }

    fn demo() -> SessionConfig {
        SessionConfig {
            name: "demo".to_string(),
            root: "~/proj".to_string(),
            windows: vec![Window::new("e", &["vim", ""]), Window::new("s", &["run"])],
            pre_window: None,
            startup_window: None,
            startup_pane: None,
        }
    }

    fn rendered(config: &SessionConfig) -> Vec<String> {
        compiler()
            .compile(config)
            .unwrap()
            .entries()
            .iter()
            .map(|inv| inv.to_string())
            .collect()
    }

    #[test]
    fn test_demo_session_compiles_in_order() {
        assert_eq!(
            rendered(&demo()),
            [
                "tmux start-server",
                "tmux new-session -d -s demo -n e -c /home/u/proj",
                "tmux send-keys -t demo:0.0 vim Enter",
                "tmux split-window -t demo:0 -c /home/u/proj",
                "tmux select-layout -t demo:0 tiled",
                "tmux new-window -t demo:1 -n s -c /home/u/proj",
                "tmux send-keys -t demo:1.0 run Enter",
                "tmux select-layout -t demo:1 tiled",
                "tmux select-window -t demo:0",
                "tmux select-pane -t demo:0.0",
            ]
        );
    }

    #[test]
    fn test_command_count_matches_topology() {
        let mut config = demo();
        config.pre_window = Some("source .env".to_string());
        config.windows.push(Window::new("logs", &["", "tail -f a", "tail -f b"]));

        let chain = compiler().compile(&config).unwrap();

        let mut expected = 2 + 2;
        for (i, window) in config.windows.iter().enumerate() {
            expected += usize::from(i > 0) + 1;
            for (j, pane) in window.panes.iter().enumerate() {
                expected += usize::from(j > 0) + 1 + usize::from(!pane.is_empty());
            }
        }
        assert_eq!(chain.len(), expected);
    }

    #[test]
    fn test_first_pane_never_splits() {
        let mut config = demo();
        config.windows[0].panes = vec!["only".to_string()];

        let commands = rendered(&config);
        assert!(!commands.iter().any(|c| c.starts_with("tmux split-window -t demo:0 ")));
    }

    #[test]
    fn test_window_without_panes_still_gets_layout() {
        let mut config = demo();
        config.windows = vec![Window::new("empty", &[])];

        let commands = rendered(&config);
        assert_eq!(commands[2], "tmux select-layout -t demo:0 tiled");
        assert_eq!(commands.len(), 5);
    }

    #[test]
    fn test_pre_window_precedes_pane_command() {
        let mut config = demo();
        config.pre_window = Some("nvm use".to_string());

        let commands = rendered(&config);
        let pane0: Vec<_> = commands.iter().filter(|c| c.contains("demo:0.0")).collect();
        assert_eq!(
            pane0,
            [
                "tmux send-keys -t demo:0.0 nvm use Enter",
                "tmux send-keys -t demo:0.0 vim Enter",
                "tmux select-pane -t demo:0.0",
            ]
        );
        // Empty panes still receive the pre-window command
        assert!(commands.contains(&"tmux send-keys -t demo:0.1 nvm use Enter".to_string()));
    }

    #[test]
    fn test_explicit_layout_passes_through() {
        let mut config = demo();
        config.windows[1] = config.windows[1].clone().layout("main-horizontal");

        let commands = rendered(&config);
        assert!(commands.contains(&"tmux select-layout -t demo:0 tiled".to_string()));
        assert!(commands.contains(&"tmux select-layout -t demo:1 main-horizontal".to_string()));
    }

    #[test]
    fn test_layout_follows_splits() {
        let mut config = demo();
        config.windows[0].panes.push("htop".to_string());

        let commands = rendered(&config);
        let layout = commands
            .iter()
            .position(|c| c == "tmux select-layout -t demo:0 tiled")
            .unwrap();
        let last_split = commands
            .iter()
            .rposition(|c| c.starts_with("tmux split-window -t demo:0 "))
            .unwrap();
        assert!(last_split < layout);
    }

    #[test]
    fn test_startup_target() {
        let mut config = demo();
        config.startup_window = Some("s".to_string());
        config.startup_pane = Some(2);

        let commands = rendered(&config);
        assert_eq!(
            &commands[commands.len() - 2..],
            ["tmux select-window -t demo:s", "tmux select-pane -t demo:s.2"]
        );
    }

    #[test]
    fn test_window_roots() {
        let mut config = demo();
        config.windows[0] = config.windows[0].clone().root("~/my code");
        config.windows[1] = config.windows[1].clone().root("/srv/app data");

        let chain = compiler().compile(&config).unwrap();
        let entries = chain.entries();

        // new-session receives the first window root unescaped
        assert_eq!(entries[1].args.last().unwrap(), "/home/u/my code");
        assert_eq!(entries[3].to_string(), "tmux split-window -t demo:0 -c /home/u/my\\ code");
        assert!(
            entries
                .iter()
                .any(|e| e.to_string() == "tmux new-window -t demo:1 -n s -c /srv/app\\ data")
        );
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let root = compiler().resolve_root("proj").unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("proj"));
    }

    #[test]
    fn test_empty_windows_is_config_error() {
        let mut config = demo();
        config.windows.clear();

        assert!(matches!(
            compiler().compile(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_compile_does_not_change_directory() {
        let before = std::env::current_dir().unwrap();
        let mut config = demo();
        config.root = "/".to_string();

        compiler().compile(&config).unwrap();
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
