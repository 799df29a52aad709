//! Layered configuration.
//!
//! Sources are applied in order, later ones overriding earlier ones:
//!
//! 1. the base file (`orggraph.toml` unless told otherwise),
//! 2. an optional development overlay next to it (`orggraph.development.toml`),
//! 3. `ORGGRAPH_COSMOS_*` environment variables.
//!
//! Every connection key must be present once all sources are merged;
//! otherwise loading fails with [`ConfigError::Missing`] before anything
//! touches the network.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Default base configuration file name.
pub const CONFIG_FILE: &str = "orggraph.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ORGGRAPH_COSMOS_";

const KEY_HOSTNAME: &str = "cosmos.hostname";
const KEY_MASTER_KEY: &str = "cosmos.master_key";
const KEY_DATABASE: &str = "cosmos.database";
const KEY_CONTAINER: &str = "cosmos.container";
const KEY_BINDING_MODE: &str = "cosmos.binding_mode";

/// How statement arguments reach the remote engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    /// Arguments travel as named bindings next to the script.
    #[default]
    Bound,
    /// Arguments are rendered into the script as escaped string literals.
    /// For engines that reject bindings.
    Inline,
}

impl FromStr for BindingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bound" => Ok(Self::Bound),
            "inline" => Ok(Self::Inline),
            other => Err(ConfigError::InvalidValue {
                key: KEY_BINDING_MODE.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Connection parameters for the Cosmos DB Gremlin endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct CosmosSettings {
    pub hostname: String,
    pub master_key: String,
    pub database: String,
    pub container: String,
    pub binding_mode: BindingMode,
}

impl fmt::Debug for CosmosSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosSettings")
            .field("hostname", &self.hostname)
            .field("master_key", &"<redacted>")
            .field("database", &self.database)
            .field("container", &self.container)
            .field("binding_mode", &self.binding_mode)
            .finish()
    }
}

/// Locations of the three CSV sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPaths {
    pub people: PathBuf,
    pub skills: PathBuf,
    pub relationships: PathBuf,
}

impl Default for ImportPaths {
    fn default() -> Self {
        Self {
            people: PathBuf::from("Data/people.csv"),
            skills: PathBuf::from("Data/skills.csv"),
            relationships: PathBuf::from("Data/relationships.csv"),
        }
    }
}

/// Fully resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cosmos: CosmosSettings,
    pub import: ImportPaths,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    cosmos: RawCosmos,
    #[serde(default)]
    import: RawImport,
}

#[derive(Debug, Default, Deserialize)]
struct RawCosmos {
    hostname: Option<String>,
    master_key: Option<String>,
    database: Option<String>,
    container: Option<String>,
    binding_mode: Option<BindingMode>,
}

#[derive(Debug, Default, Deserialize)]
struct RawImport {
    people: Option<PathBuf>,
    skills: Option<PathBuf>,
    relationships: Option<PathBuf>,
}

impl RawSettings {
    fn overlay(&mut self, other: RawSettings) {
        let c = other.cosmos;
        self.cosmos.hostname = c.hostname.or(self.cosmos.hostname.take());
        self.cosmos.master_key = c.master_key.or(self.cosmos.master_key.take());
        self.cosmos.database = c.database.or(self.cosmos.database.take());
        self.cosmos.container = c.container.or(self.cosmos.container.take());
        self.cosmos.binding_mode = c.binding_mode.or(self.cosmos.binding_mode);

        let i = other.import;
        self.import.people = i.people.or(self.import.people.take());
        self.import.skills = i.skills.or(self.import.skills.take());
        self.import.relationships = i.relationships.or(self.import.relationships.take());
    }

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> ConfigResult<()> {
        // A blank variable is unset, so it never hides a lower layer.
        let var = |suffix: &str| {
            env(&format!("{ENV_PREFIX}{suffix}")).filter(|v| !v.trim().is_empty())
        };

        if let Some(v) = var("HOSTNAME") {
            self.cosmos.hostname = Some(v);
        }
        if let Some(v) = var("MASTER_KEY") {
            self.cosmos.master_key = Some(v);
        }
        if let Some(v) = var("DATABASE") {
            self.cosmos.database = Some(v);
        }
        if let Some(v) = var("CONTAINER") {
            self.cosmos.container = Some(v);
        }
        if let Some(v) = var("BINDING_MODE") {
            self.cosmos.binding_mode = Some(v.parse()?);
        }
        Ok(())
    }

    fn resolve(self) -> ConfigResult<Settings> {
        let defaults = ImportPaths::default();
        let c = self.cosmos;

        Ok(Settings {
            cosmos: CosmosSettings {
                hostname: required(c.hostname, KEY_HOSTNAME)?,
                master_key: required(c.master_key, KEY_MASTER_KEY)?,
                database: required(c.database, KEY_DATABASE)?,
                container: required(c.container, KEY_CONTAINER)?,
                binding_mode: c.binding_mode.unwrap_or_default(),
            },
            import: ImportPaths {
                people: self.import.people.unwrap_or(defaults.people),
                skills: self.import.skills.unwrap_or(defaults.skills),
                relationships: self.import.relationships.unwrap_or(defaults.relationships),
            },
        })
    }
}

fn required(value: Option<String>, key: &str) -> ConfigResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::missing(key)),
    }
}

/// Path of the development overlay that sits next to `base`.
///
/// `conf/orggraph.toml` becomes `conf/orggraph.development.toml`.
pub fn development_overlay_path(base: &Path) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("orggraph");
    base.with_file_name(format!("{stem}.development.toml"))
}

fn read_layer(path: &Path) -> ConfigResult<Option<RawSettings>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(toml::from_str(&text)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Configuration layer not present");
            Ok(None)
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl Settings {
    /// Load settings from `base`, its development overlay and the process
    /// environment.
    pub fn load(base: &Path) -> ConfigResult<Self> {
        Self::load_with_env(base, &|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::load`] with an injectable environment lookup.
    pub fn load_with_env(base: &Path, env: &dyn Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut raw = RawSettings::default();

        for path in [base.to_path_buf(), development_overlay_path(base)] {
            if let Some(layer) = read_layer(&path)? {
                debug!(path = %path.display(), "Applied configuration layer");
                raw.overlay(layer);
            }
        }

        raw.apply_env(env)?;
        raw.resolve()
    }

    /// Parse a single TOML document with no overlay or environment.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let raw: RawSettings = toml::from_str(text)?;
        raw.resolve()
    }
}
