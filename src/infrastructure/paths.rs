//! Path utilities for locating cityfinder's on-disk state.
//!
//! The data directory holds the key-value store (`store.json`) and the rotating log
//! file. It defaults to the platform data directory reported by `directories` and can
//! be overridden through configuration.

use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

/// Name of the key-value container file inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "cityfinder.log";

/// Returns the default data directory for cityfinder.
///
/// Resolves to the platform data directory (for example
/// `~/.local/share/cityfinder` on Linux). Falls back to `./.cityfinder` when no home
/// directory can be determined.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    ProjectDirs::from("org", "cityfinder", "cityfinder").map_or_else(
        || PathBuf::from(".cityfinder"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Returns the path of the key-value container inside `data_dir`.
#[must_use]
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE_NAME)
}

/// Returns the path of the log file inside `data_dir`.
#[must_use]
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or environments without a home directory, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use cityfinder::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/var/lib/cityfinder"), PathBuf::from("/var/lib/cityfinder"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
