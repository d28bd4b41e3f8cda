//! Cityfinder: city search and favorites backed by the GeoNames Wikipedia API.
//!
//! Cityfinder provides:
//! - Free-text city search through a remote HTTP endpoint
//! - A detail view for the selected city
//! - A durable set of favorite cities in a local JSON store
//! - A line-oriented shell driving all of the above
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Shell (main.rs)                                    │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Catalog Service (catalog.rs)                       │  ← Runtime
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - View models │   │ - JSON I/O    │   │ - tokio tasks │
//! │ - Rendering   │   │ - Favorites   │   │ - Remote      │
//! │               │   │ - Backend API │   │   search      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Error types (domain/error)                       │
//! │  - City model and wire format (domain/city)         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Catalog state machine with event/action model
//! - [`catalog`]: Runtime owning state, worker and event bus
//! - [`domain`]: Core domain types (`CityRecord`, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`remote`]: Search client and HTTP transport
//! - [`storage`]: Key-value stores and the favorites set
//! - [`worker`]: Background search execution
//! - [`ui`]: View models and plain-text rendering
//! - [`observability`]: Rotating file logging
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/cityfinder/config.toml
//! endpoint = "http://api.geonames.org/wikipediaSearchJSON"
//! username = "demo"
//! max_rows = 10
//! identity = "fresh"
//! data_dir = "~/.local/share/cityfinder"
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cityfinder::{initialize, Config};
//!
//! # async fn demo() -> cityfinder::Result<()> {
//! let mut catalog = initialize(&Config::default())?;
//! catalog.search("Paris", |_| {})?;
//! catalog.run_until_idle().await;
//!
//! for city in catalog.results() {
//!     println!("{} ({})", city.title, city.country_code);
//! }
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod remote;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, CatalogEvent, CatalogState, Event};
pub use catalog::{CatalogService, SearchCallback, SearchOutcome};
pub use domain::{CityId, CityRecord, CityfinderError, IdentityPolicy, Result, SearchError};

use crate::domain::error::CityfinderError as Error;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default search endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://api.geonames.org/wikipediaSearchJSON";

/// Default account name sent with every request.
pub const DEFAULT_USERNAME: &str = "demo";

/// Default row limit per search.
pub const DEFAULT_MAX_ROWS: u32 = 10;

/// Default response style.
pub const DEFAULT_STYLE: &str = "full";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute URL of the search endpoint.
    pub endpoint: String,

    /// Account name sent as the `username` query parameter.
    pub username: String,

    /// Maximum number of results per search. Default: 10
    pub max_rows: u32,

    /// Response verbosity sent as the `style` query parameter. Default: `"full"`
    pub style: String,

    /// How identifiers are assigned to decoded cities.
    pub identity: IdentityPolicy,

    /// Directory holding `store.json` and the log file.
    ///
    /// A leading `~` is expanded. Default: the platform data directory.
    pub data_dir: Option<String>,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            style: DEFAULT_STYLE.to_string(),
            identity: IdentityPolicy::default(),
            data_dir: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - `endpoint`, `username`, `style`: taken as-is when non-empty
    /// - `max_rows`: String → `u32` (falls back to 10 on parse error or zero)
    /// - `identity`: `fresh` or `content` (falls back to `fresh`)
    /// - `data_dir`, `trace_level`: String → `Option<String>`
    ///
    /// Unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use cityfinder::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("max_rows".to_string(), "25".to_string());
    /// map.insert("identity".to_string(), "bogus".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.max_rows, 25);
    /// assert_eq!(config.identity, cityfinder::IdentityPolicy::Fresh);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let max_rows = config
            .get("max_rows")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_ROWS);

        let identity = config
            .get("identity")
            .and_then(|s| {
                let policy = IdentityPolicy::from_name(s);
                if policy.is_none() {
                    tracing::warn!(identity = %s, "unknown identity policy, using default");
                }
                policy
            })
            .unwrap_or_default();

        Self {
            endpoint: non_empty("endpoint").unwrap_or(defaults.endpoint),
            username: non_empty("username").unwrap_or(defaults.username),
            max_rows,
            style: non_empty("style").unwrap_or(defaults.style),
            identity,
            data_dir: non_empty("data_dir"),
            trace_level: non_empty("trace_level"),
        }
    }

    /// Loads configuration from a TOML file of top-level keys.
    ///
    /// String, integer and boolean values are accepted; everything is then parsed
    /// with [`Config::from_map`] rules.
    ///
    /// # Errors
    ///
    /// Returns [`CityfinderError::Io`] if the file cannot be read, or
    /// [`CityfinderError::Config`] if it is not valid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CityfinderError::Config`] if the text is not valid TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e: toml::de::Error| Error::Config(e.to_string()))?;

        let map: BTreeMap<String, String> = table
            .into_iter()
            .filter_map(|(key, value)| match value {
                toml::Value::String(s) => Some((key, s)),
                toml::Value::Integer(i) => Some((key, i.to_string())),
                toml::Value::Boolean(b) => Some((key, b.to_string())),
                other => {
                    tracing::warn!(key = %key, value = %other, "ignoring unsupported config value");
                    None
                }
            })
            .collect();

        Ok(Self::from_map(&map))
    }

    /// Resolves the data directory, expanding `~`.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .map_or_else(infrastructure::get_data_dir, infrastructure::expand_tilde)
    }
}

/// Initializes logging and opens the catalog described by `config`.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if the endpoint is invalid or the store cannot be opened.
/// Logging problems are never fatal.
pub fn initialize(config: &Config) -> Result<CatalogService> {
    observability::init_tracing(config);
    tracing::debug!(endpoint = %config.endpoint, max_rows = config.max_rows, "initializing cityfinder");
    CatalogService::from_config(config)
}
