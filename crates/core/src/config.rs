//! Configuration types and persistence for trellis sessions
//!
//! A session config is a YAML document stored as `<name>.yaml` inside the
//! config directory (`~/.trellis` by default). It names the tmux session,
//! its root directory and the ordered windows and panes to build.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Extension used for stored session configs
pub const CONFIG_EXTENSION: &str = "yaml";

/// Name of the config directory inside the user's home
pub const CONFIG_DIR_NAME: &str = ".trellis";

// =============================================================================
// Session Configuration
// =============================================================================

/// Top level description of a tmux session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session name (used as tmux session name)
    pub name: String,
    /// Base working directory, may start with `~/`
    pub root: String,
    /// Windows in creation order
    #[serde(default)]
    pub windows: Vec<Window>,
    /// Command sent to every pane before the pane's own command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_window: Option<String>,
    /// Window focused on attach (index or name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_window: Option<String>,
    /// Pane focused on attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_pane: Option<u32>,
}

/// A tmux window and its panes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Window name shown in the status bar
    pub name: String,
    /// tmux layout applied once all panes exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Working directory override for this window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Pane commands; an empty string leaves a plain shell
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panes: Vec<String>,
}

impl Window {
    /// Create a window with the given name and pane commands
    pub fn new(name: impl Into<String>, panes: &[&str]) -> Self {
        Self {
            name: name.into(),
            layout: None,
            root: None,
            panes: panes.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Set the layout
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Set the window root
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }
}

impl SessionConfig {
    /// Starter config written by `trellis new`
    pub fn template(name: &str) -> Self {
        Self {
            name: name.to_string(),
            root: "~/".to_string(),
            windows: vec![
                Window::new("editor", &["vim", "guard"]).layout("main-vertical"),
                Window::new("server", &["bundle exec rails s"]),
                Window::new("logs", &["tail -f log/development.log"]),
            ],
            pre_window: None,
            startup_window: None,
            startup_pane: None,
        }
    }

    /// Check the invariants the layout compiler relies on
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.root.is_empty() {
            missing.push("root");
        }
        if self.windows.is_empty() {
            missing.push("windows");
        }
        if !missing.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "missing {} in session config",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Parse a config from YAML text
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render the config as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// =============================================================================
// Config Store
// =============================================================================

/// Directory of stored session configs
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `~/.trellis`
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(CONFIG_DIR_NAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the config directory if needed
    pub fn ensure_dir(&self) -> Result<()> {
        match std::fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(Error::NotADirectory(self.dir.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => std::fs::create_dir_all(&self.dir)
                .map_err(|source| Error::FileWrite {
                    path: self.dir.clone(),
                    source,
                }),
            Err(source) => Err(Error::FileRead {
                path: self.dir.clone(),
                source,
            }),
        }
    }

    /// Path of the config file for a session name
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, CONFIG_EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Load and validate a stored config
    pub fn load(&self, name: &str) -> Result<SessionConfig> {
        if !self.exists(name) {
            return Err(Error::ConfigNotFound(name.to_string()));
        }
        let path = self.path(name);
        let content = std::fs::read_to_string(&path).map_err(|source| Error::FileRead {
            path: path.clone(),
            source,
        })?;
        let config = SessionConfig::from_yaml(&content, &path)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a config, replacing any existing file with the same name
    pub fn save(&self, config: &SessionConfig) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.path(&config.name);
        let yaml = config.to_yaml()?;
        std::fs::write(&path, yaml).map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Remove a stored config; a missing file is not an error
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        match std::fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(Error::FileWrite { path, source: e })
            }
            _ => Ok(()),
        }
    }

    /// Names of all stored configs, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| Error::FileRead {
            path: self.dir.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: demo
root: ~/proj
windows:
  - name: editor
    panes: ["vim", ""]
  - name: server
    layout: main-vertical
    root: /srv
    panes: ["run"]
"#;
        let config = SessionConfig::from_yaml(yaml, Path::new("demo.yaml")).unwrap();
        assert_eq!(config.name, "demo");
        assert_eq!(config.windows.len(), 2);
        assert_eq!(config.windows[0].panes, vec!["vim", ""]);
        assert_eq!(config.windows[0].layout, None);
        assert_eq!(config.windows[1].layout.as_deref(), Some("main-vertical"));
        assert_eq!(config.windows[1].root.as_deref(), Some("/srv"));
        assert_eq!(config.pre_window, None);
        assert_eq!(config.startup_pane, None);
    }

    #[test]
    fn test_validate_rejects_empty_windows() {
        let mut config = SessionConfig::template("demo");
        config.windows.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("windows"));
    }

    #[test]
    fn test_validate_lists_every_missing_field() {
        let config = SessionConfig {
            name: String::new(),
            root: String::new(),
            windows: Vec::new(),
            pre_window: None,
            startup_window: None,
            startup_pane: None,
        };
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("name, root, windows"), "{}", msg);
    }

    #[test]
    fn test_template_is_valid() {
        let config = SessionConfig::template("rails");
        config.validate().unwrap();
        assert_eq!(config.root, "~/");
        assert_eq!(config.windows[0].layout.as_deref(), Some("main-vertical"));
        assert_eq!(config.windows[2].panes, vec!["tail -f log/development.log"]);
    }

    #[test]
    fn test_store_save_load_list_delete() {
        let temp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(temp.path().join("configs"));

        store.save(&SessionConfig::template("beta")).unwrap();
        store.save(&SessionConfig::template("alpha")).unwrap();
        std::fs::create_dir(store.dir().join("nested.yaml")).unwrap();
        std::fs::write(store.dir().join("notes.txt"), "x").unwrap();

        assert!(store.exists("alpha"));
        assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);
        assert_eq!(store.load("beta").unwrap(), SessionConfig::template("beta"));

        store.delete("alpha").unwrap();
        store.delete("alpha").unwrap();
        assert!(!store.exists("alpha"));
        assert!(matches!(
            store.load("alpha"),
            Err(Error::ConfigNotFound(name)) if name == "alpha"
        ));
    }

    #[test]
    fn test_store_rejects_invalid_document() {
        let temp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(temp.path());
        std::fs::write(store.path("empty"), "name: empty\nroot: ~/\nwindows: []\n").unwrap();

        assert!(matches!(store.load("empty"), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("trellis");
        std::fs::write(&file, "").unwrap();

        let store = ConfigStore::new(&file);
        assert!(matches!(store.ensure_dir(), Err(Error::NotADirectory(_))));
    }
}
