//! Config management commands for trellis.
//!
//! Creates, edits and lists the session configs kept in the config directory.

use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;
use serde::Serialize;
use trellis_core::{ConfigStore, SessionConfig};

use crate::display_path;

/// Environment variable naming the user's editor
const EDITOR_ENV: &str = "EDITOR";

/// JSON output format for a stored config
#[derive(Debug, Serialize)]
pub struct ConfigInfo {
    /// Session name
    pub name: String,
    /// Session root as written in the config
    pub root: Option<String>,
    /// Window names in order
    pub windows: Vec<String>,
    /// Whether the file parsed and validated
    pub valid: bool,
}

impl ConfigInfo {
    fn invalid(name: &str) -> Self {
        Self {
            name: name.to_string(),
            root: None,
            windows: Vec::new(),
            valid: false,
        }
    }
}

impl From<&SessionConfig> for ConfigInfo {
    fn from(config: &SessionConfig) -> Self {
        Self {
            name: config.name.clone(),
            root: Some(config.root.clone()),
            windows: config.windows.iter().map(|w| w.name.clone()).collect(),
            valid: true,
        }
    }
}

/// Collect info for every stored config
pub fn collect_configs(store: &ConfigStore) -> Result<Vec<ConfigInfo>> {
    store.ensure_dir()?;
    Ok(store
        .list()?
        .iter()
        .map(|name| match store.load(name) {
            Ok(config) => ConfigInfo::from(&config),
            Err(_) => ConfigInfo::invalid(name),
        })
        .collect())
}

/// List stored session configs
pub fn do_list(store: &ConfigStore, json: bool) -> Result<()> {
    let configs = collect_configs(store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&configs)?);
        return Ok(());
    }

    if configs.is_empty() {
        println!(
            "{} {}",
            "No session configs in".dimmed(),
            display_path(store.dir())
        );
        return Ok(());
    }

    use comfy_table::{Table, presets::NOTHING};

    let mut table = Table::new();
    table.load_preset(NOTHING);

    for config in &configs {
        if !config.valid {
            table.add_row(vec![
                config.name.blue().to_string(),
                "invalid".red().to_string(),
                String::new(),
            ]);
            continue;
        }

        let count = config.windows.len();
        let windows_label = if count == 1 { "window" } else { "windows" };
        table.add_row(vec![
            config.name.blue().to_string(),
            config.root.clone().unwrap_or_default().dimmed().to_string(),
            format!("{} {}", count, windows_label).dimmed().to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Write the starter config for `name` and open it for editing
pub fn do_new(store: &ConfigStore, name: &str) -> Result<()> {
    if store.exists(name) {
        bail!("Config with the same name already exists: {}", name);
    }

    let path = store.save(&SessionConfig::template(name))?;
    println!("{} {} {}", "✔".green(), "Created".dimmed(), display_path(&path));
    open_in_editor(&path)
}

/// Open an existing config in the user's editor
pub fn do_edit(store: &ConfigStore, name: &str) -> Result<()> {
    if !store.exists(name) {
        bail!("Could not find config: {}", name);
    }
    open_in_editor(&store.path(name))
}

/// Delete a stored config
pub fn do_rm(store: &ConfigStore, name: &str) -> Result<()> {
    if !store.exists(name) {
        bail!("Could not find config: {}", name);
    }
    store.delete(name)?;
    println!("{} {} {}", "✔".green(), "Deleted".dimmed(), name);
    Ok(())
}

/// Replace this process with `$EDITOR <path>`
fn open_in_editor(path: &Path) -> Result<()> {
    let editor = match std::env::var(EDITOR_ENV) {
        Ok(editor) if !editor.is_empty() => editor,
        _ => bail!("{} variable not defined in env", EDITOR_ENV),
    };

    let mut command = std::process::Command::new(&editor);
    command.arg(path);
    run_editor(command, &editor)
}

#[cfg(unix)]
fn run_editor(mut command: std::process::Command, editor: &str) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let err = command.exec();
    Err(anyhow::Error::new(err).context(format!("Could not launch editor {}", editor)))
}

#[cfg(not(unix))]
fn run_editor(mut command: std::process::Command, editor: &str) -> Result<()> {
    let status = command.status()?;
    if !status.success() {
        bail!("{} exited with {}", editor, status);
    }
    Ok(())
}
