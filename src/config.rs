//! Resolver entry configuration.
//!
//! Values come from [`ResolverConfig::default`], optionally overlaid by a TOML
//! settings file:
//!
//! ```toml
//! [resolv]
//! nameserver = "127.0.0.1"
//! marker = "# managed by pygmy"
//! common_file = "/etc/resolv.conf"
//! ubuntu_file = "/etc/resolvconf/resolv.conf.d/head"
//! ```

use crate::error::{ResolverError, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Default nameserver address written into the managed entry.
pub const DEFAULT_NAMESERVER: &str = "127.0.0.1";

/// Trailing comment identifying the managed entry.
pub const DEFAULT_MARKER: &str = "# managed by pygmy";

/// Resolver file used on Fedora, Arch and unrecognised platforms.
pub const COMMON_RESOLV_FILE: &str = "/etc/resolv.conf";

/// `resolvconf` head fragment used on Ubuntu.
pub const UBUNTU_RESOLV_FILE: &str = "/etc/resolvconf/resolv.conf.d/head";

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "PYGMY_RESOLV_CONFIG";

/// Configuration for the managed `nameserver` entry.
///
/// # Example
///
/// ```
/// use pygmy_resolv::ResolverConfig;
///
/// let config = ResolverConfig::new("10.0.0.53").with_resolv_file("/tmp/resolv.conf");
///
/// assert_eq!(config.managed_line(), "nameserver 10.0.0.53 # managed by pygmy");
/// assert_eq!(config.common_file, config.ubuntu_file);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Nameserver IP address (e.g., `"127.0.0.1"`).
    pub nameserver: String,

    /// Comment appended to the entry so it can be told apart from
    /// nameservers written by the OS or the user.
    pub marker: String,

    /// Resolver file on Fedora, Arch, and unknown platforms.
    pub common_file: PathBuf,

    /// Resolver file on Ubuntu.
    pub ubuntu_file: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    resolv: ResolverConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            nameserver: DEFAULT_NAMESERVER.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            common_file: PathBuf::from(COMMON_RESOLV_FILE),
            ubuntu_file: PathBuf::from(UBUNTU_RESOLV_FILE),
        }
    }
}

impl ResolverConfig {
    /// Creates a config with the given nameserver and default paths.
    #[must_use]
    pub fn new(nameserver: impl Into<String>) -> Self {
        Self {
            nameserver: nameserver.into(),
            ..Self::default()
        }
    }

    /// Overrides the marker comment.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Overrides the common resolver file.
    #[must_use]
    pub fn with_common_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.common_file = path.into();
        self
    }

    /// Overrides the Ubuntu resolver file.
    #[must_use]
    pub fn with_ubuntu_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ubuntu_file = path.into();
        self
    }

    /// Points both platform paths at `path` (useful for testing).
    #[must_use]
    pub fn with_resolv_file(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with_common_file(path.clone()).with_ubuntu_file(path)
    }

    /// The exact line written into the resolver file.
    #[must_use]
    pub fn managed_line(&self) -> String {
        format!("nameserver {} {}", self.nameserver, self.marker)
    }

    /// Checks the values that end up in the resolver file.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::InvalidConfig`] if the nameserver is not an IP
    /// address or the marker is not a single-line `#` comment.
    pub fn validate(&self) -> Result<()> {
        if self.nameserver.parse::<IpAddr>().is_err() {
            return Err(ResolverError::InvalidConfig(format!(
                "nameserver must be an IP address, got {:?}",
                self.nameserver
            )));
        }
        if !self.marker.starts_with('#') {
            return Err(ResolverError::InvalidConfig(format!(
                "marker must start with '#', got {:?}",
                self.marker
            )));
        }
        if self.marker.contains(['\n', '\r']) {
            return Err(ResolverError::InvalidConfig(
                "marker must fit on a single line".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads and validates the `[resolv]` table of a TOML settings file.
    /// Keys missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::ConfigRead`] if the file cannot be read,
    /// [`ResolverError::ConfigParse`] if it is not valid settings TOML, or
    /// [`ResolverError::InvalidConfig`] if validation fails.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ResolverError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: SettingsFile =
            toml::from_str(&raw).map_err(|source| ResolverError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.resolv.validate()?;
        tracing::debug!(path = %path.display(), "Loaded resolver settings");
        Ok(settings.resolv)
    }

    /// Resolves the settings file to use and loads it.
    ///
    /// Lookup order: `explicit`, then `$PYGMY_RESOLV_CONFIG`, then
    /// `config.toml` in the per-user config directory. The first two must
    /// exist; the last one falls back to defaults when absent.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        match default_settings_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Per-user settings file location (e.g. `~/.config/pygmy-resolv/config.toml`).
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "amazee", "pygmy-resolv")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
