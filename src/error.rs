//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Errors returned by resolver operations.
///
/// Each variant names the step that failed: locating the resolver file,
/// reading it, or writing it back.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The platform is unrecognised and the common resolver file is absent.
    #[error("unable to determine location of resolv file ({} does not exist)", .path.display())]
    LocationNotFound {
        /// The common path that was checked.
        path: PathBuf,
    },

    /// The resolver file could not be read.
    #[error("failed to read resolv file {}: {source}", .path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The resolver file could not be written back.
    #[error("failed to write resolv file {}: {source}", .path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Invalid configuration values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The settings file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        /// The settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file exists but is not valid TOML for [`crate::ResolverConfig`].
    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        /// The settings file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },
}

impl ResolverError {
    /// Returns `true` if the underlying I/O error is `PermissionDenied`.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::Read { source, .. } | Self::Write { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn location_message_mentions_resolv_file() {
        let e = ResolverError::LocationNotFound {
            path: PathBuf::from("/etc/resolv.conf"),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("unable to determine location of resolv file"));
        assert!(msg.contains("/etc/resolv.conf"));
    }

    #[test]
    fn read_and_write_name_the_step() {
        let read = ResolverError::Read {
            path: PathBuf::from("/tmp/r"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let write = ResolverError::Write {
            path: PathBuf::from("/tmp/r"),
            source: io::Error::other("disk full"),
        };
        assert!(read.to_string().starts_with("failed to read"));
        assert!(write.to_string().starts_with("failed to write"));
    }

    #[test]
    fn permission_denied_detection() {
        let denied = ResolverError::Write {
            path: PathBuf::from("/etc/resolv.conf"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let missing = ResolverError::Read {
            path: PathBuf::from("/etc/resolv.conf"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(denied.is_permission_denied());
        assert!(!missing.is_permission_denied());
        assert!(!ResolverError::InvalidConfig("x".into()).is_permission_denied());
    }
}
