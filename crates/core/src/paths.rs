//! Path helpers shared by the layout compiler and the config store.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve the user's home directory
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(Error::HomeDir)
}

/// Expand a leading `~/` against an explicit home directory
pub fn expand_path_with(path: &str, home: &Path) -> String {
    match path.strip_prefix("~/") {
        Some(stripped) => {
            let home = home.to_string_lossy();
            format!("{}/{}", home.trim_end_matches('/'), stripped)
        }
        None => path.to_string(),
    }
}

/// Escape spaces so the path survives as a single shell word
pub fn escape_path(path: &str) -> String {
    path.replace(' ', "\\ ")
}
