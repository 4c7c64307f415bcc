//! Linux distribution detection.
//!
//! The checks are independent predicates behind [`PlatformProbe`] so callers
//! (and tests) can substitute fixed answers. [`PlatformKind::detect`] folds
//! them into a single value using Ubuntu > Fedora > Arch precedence.

use std::fmt;
use std::path::{Path, PathBuf};

/// Queries that classify the host.
///
/// The predicates are not mutually exclusive; a derivative may answer `true`
/// to more than one.
pub trait PlatformProbe {
    /// Ubuntu or an Ubuntu derivative.
    fn is_ubuntu(&self) -> bool;
    /// Fedora or a Fedora derivative.
    fn is_fedora(&self) -> bool;
    /// Arch Linux or an Arch derivative.
    fn is_arch(&self) -> bool;
}

/// Distribution flavour relevant to resolver file placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Ubuntu,
    Fedora,
    Arch,
    Unknown,
}

impl PlatformKind {
    /// Classifies the host, checking Ubuntu first, then Fedora, then Arch.
    #[must_use]
    pub fn detect(probe: &dyn PlatformProbe) -> Self {
        if probe.is_ubuntu() {
            Self::Ubuntu
        } else if probe.is_fedora() {
            Self::Fedora
        } else if probe.is_arch() {
            Self::Arch
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ubuntu => write!(f, "ubuntu"),
            Self::Fedora => write!(f, "fedora"),
            Self::Arch => write!(f, "arch"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A fixed classification answers only its own predicate.
impl PlatformProbe for PlatformKind {
    fn is_ubuntu(&self) -> bool {
        *self == Self::Ubuntu
    }

    fn is_fedora(&self) -> bool {
        *self == Self::Fedora
    }

    fn is_arch(&self) -> bool {
        *self == Self::Arch
    }
}

/// Probe backed by `os-release(5)` and distribution marker files.
///
/// Every lookup re-reads the files; a missing or unreadable file simply
/// means "not this platform".
#[derive(Debug, Clone)]
pub struct OsRelease {
    root: PathBuf,
}

impl OsRelease {
    /// Probe the running system.
    #[must_use]
    pub fn system() -> Self {
        Self::with_root("/")
    }

    /// Probe a filesystem tree mounted at `root` (useful for testing).
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory being probed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(relative)).ok()
    }

    fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    /// `ID` plus the entries of `ID_LIKE`, lowercased.
    fn ids(&self) -> Vec<String> {
        let Some(contents) = self
            .read("etc/os-release")
            .or_else(|| self.read("usr/lib/os-release"))
        else {
            return Vec::new();
        };

        let mut ids = Vec::new();
        for (key, value) in contents.lines().filter_map(parse_assignment) {
            match key {
                "ID" => ids.push(value.to_ascii_lowercase()),
                "ID_LIKE" => ids.extend(value.split_whitespace().map(str::to_ascii_lowercase)),
                _ => {}
            }
        }
        ids
    }

    fn has_id(&self, id: &str) -> bool {
        self.ids().iter().any(|i| i == id)
    }
}

impl Default for OsRelease {
    fn default() -> Self {
        Self::system()
    }
}

impl PlatformProbe for OsRelease {
    fn is_ubuntu(&self) -> bool {
        self.has_id("ubuntu")
            || self.read("etc/lsb-release").is_some_and(|c| {
                c.lines()
                    .filter_map(parse_assignment)
                    .any(|(k, v)| k == "DISTRIB_ID" && v.eq_ignore_ascii_case("ubuntu"))
            })
    }

    fn is_fedora(&self) -> bool {
        self.has_id("fedora") || self.exists("etc/fedora-release")
    }

    fn is_arch(&self) -> bool {
        self.has_id("arch") || self.exists("etc/arch-release")
    }
}

/// Splits a shell-style `KEY=value` line, stripping one layer of quotes.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    Some((key.trim(), value))
}
