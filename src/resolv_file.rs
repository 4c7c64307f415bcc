//! Managed `nameserver` entry in the system resolver file.
//!
//! Every operation re-reads the file from disk; nothing is cached between
//! calls. Writes replace the whole file via [`write_atomic`].

use crate::conf;
use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::platform::{OsRelease, PlatformKind, PlatformProbe};
use crate::util::write_atomic;
use std::path::{Path, PathBuf};

/// Adds and removes the managed entry in the platform's resolver file.
///
/// # Lifecycle
///
/// 1. [`configure`](Self::configure) puts the entry on the first line so it
///    is consulted before any other nameserver.
/// 2. [`clean`](Self::clean) takes it out again, leaving every other line as
///    it was.
///
/// Both are idempotent. Concurrent editors (DHCP, VPN clients, other
/// instances) are not locked out; the last writer wins.
///
/// # Permissions
///
/// The resolver files live under `/etc` and require root to write. The
/// caller must handle elevation.
///
/// # Example
///
/// ```rust,ignore
/// use pygmy_resolv::{ResolvFile, ResolverConfig};
///
/// let resolv = ResolvFile::new(ResolverConfig::default());
/// resolv.configure()?;
/// assert!(resolv.has_our_nameserver()?);
/// resolv.clean()?;
/// ```
pub struct ResolvFile {
    config: ResolverConfig,
    probe: Box<dyn PlatformProbe>,
}

impl ResolvFile {
    /// Creates a manager that probes the running system.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_probe(config, OsRelease::system())
    }

    /// Creates a manager with a substitute platform probe (useful for testing).
    #[must_use]
    pub fn with_probe(config: ResolverConfig, probe: impl PlatformProbe + 'static) -> Self {
        Self {
            config,
            probe: Box::new(probe),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Classifies the host through the configured probe.
    #[must_use]
    pub fn platform(&self) -> PlatformKind {
        PlatformKind::detect(self.probe.as_ref())
    }

    /// Picks the resolver file for this platform.
    ///
    /// Ubuntu uses the `resolvconf` head fragment; Fedora and Arch use the
    /// common file. On unrecognised platforms the common file is used only if
    /// it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::LocationNotFound`] on an unrecognised platform
    /// without a common resolver file.
    pub fn resolv_file(&self) -> Result<PathBuf> {
        let path = match self.platform() {
            PlatformKind::Ubuntu => &self.config.ubuntu_file,
            PlatformKind::Fedora | PlatformKind::Arch => &self.config.common_file,
            PlatformKind::Unknown if self.config.common_file.exists() => &self.config.common_file,
            PlatformKind::Unknown => {
                return Err(ResolverError::LocationNotFound {
                    path: self.config.common_file.clone(),
                });
            }
        };
        Ok(path.clone())
    }

    /// Reads the current resolver file as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::LocationNotFound`] if no file applies, or
    /// [`ResolverError::Read`] if it cannot be read.
    pub fn resolv_file_contents(&self) -> Result<Vec<u8>> {
        let path = self.resolv_file()?;
        read(&path)
    }

    /// Returns `true` if the resolver file holds the managed entry.
    ///
    /// # Errors
    ///
    /// See [`resolv_file_contents`](Self::resolv_file_contents).
    pub fn has_our_nameserver(&self) -> Result<bool> {
        let contents = self.resolv_file_contents()?;
        Ok(conf::has_entry(&contents, &self.config.managed_line()))
    }

    /// Ensures the managed entry is the resolver file's first line.
    ///
    /// Existing lines are kept in order after it. Other lines carrying our
    /// marker (a different address, a duplicate, or our own line pushed down
    /// by another editor) are dropped. Returns `true` if the file was
    /// rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::InvalidConfig`] for an unusable config,
    /// [`ResolverError::LocationNotFound`] or [`ResolverError::Read`] before
    /// anything is written, or [`ResolverError::Write`] if the new contents
    /// cannot be stored.
    pub fn configure(&self) -> Result<bool> {
        self.config.validate()?;
        let path = self.resolv_file()?;
        let contents = read(&path)?;
        let line = self.config.managed_line();

        let Some(updated) = conf::insert_entry(&contents, &line, &self.config.marker) else {
            tracing::debug!(path = %path.display(), "Managed nameserver already present");
            return Ok(false);
        };

        write(&path, &updated)?;
        tracing::info!(
            path = %path.display(),
            platform = %self.platform(),
            nameserver = %self.config.nameserver,
            "Added managed nameserver"
        );
        Ok(true)
    }

    /// Removes every line carrying our marker from the resolver file.
    ///
    /// Returns `true` if the file was rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::LocationNotFound`] or [`ResolverError::Read`]
    /// before anything is written, or [`ResolverError::Write`] if the new
    /// contents cannot be stored.
    pub fn clean(&self) -> Result<bool> {
        let path = self.resolv_file()?;
        let contents = read(&path)?;

        let Some(updated) = conf::remove_entries(&contents, &self.config.marker) else {
            tracing::debug!(path = %path.display(), "No managed nameserver to remove");
            return Ok(false);
        };

        write(&path, &updated)?;
        tracing::info!(
            path = %path.display(),
            platform = %self.platform(),
            "Removed managed nameserver"
        );
        Ok(true)
    }

    /// Nameserver addresses currently listed in the resolver file, in order.
    ///
    /// # Errors
    ///
    /// See [`resolv_file_contents`](Self::resolv_file_contents).
    pub fn nameservers(&self) -> Result<Vec<String>> {
        Ok(conf::nameservers(&self.resolv_file_contents()?))
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| ResolverError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &[u8]) -> Result<()> {
    write_atomic(path, contents).map_err(|source| ResolverError::Write {
        path: path.to_path_buf(),
        source,
    })
}
