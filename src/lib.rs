//! # pygmy-resolv
//!
//! Point a Linux host's DNS at the local pygmy DNS container by managing a
//! single tagged `nameserver` line in the system resolver file.
//!
//! The file differs by distribution: Ubuntu's `resolvconf` assembles
//! `/etc/resolv.conf` from `/etc/resolvconf/resolv.conf.d/head`, while Fedora
//! and Arch read `/etc/resolv.conf` directly. On unrecognised distributions
//! `/etc/resolv.conf` is used only if it already exists.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use pygmy_resolv::{ResolvFile, ResolverConfig};
//!
//! let resolv = ResolvFile::new(ResolverConfig::default());
//!
//! // Adds `nameserver 127.0.0.1 # managed by pygmy` as the first line
//! // (requires root).
//! resolv.configure()?;
//! assert!(resolv.has_our_nameserver()?);
//!
//! // Removes it again; all other lines are left byte-for-byte intact.
//! resolv.clean()?;
//! ```
//!
//! Both operations are idempotent and re-read the file every time, so
//! repeated or duplicate invocations converge.
//!
//! ## Testing without touching `/etc`
//!
//! Supply a [`PlatformProbe`] and point the config at a scratch file:
//!
//! ```
//! use pygmy_resolv::{PlatformKind, ResolvFile, ResolverConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("resolv.conf");
//! std::fs::write(&path, "nameserver 10.0.34.17\n").unwrap();
//!
//! let resolv = ResolvFile::with_probe(
//!     ResolverConfig::default().with_resolv_file(&path),
//!     PlatformKind::Fedora,
//! );
//! resolv.configure().unwrap();
//! assert_eq!(
//!     std::fs::read_to_string(&path).unwrap(),
//!     "nameserver 127.0.0.1 # managed by pygmy\nnameserver 10.0.34.17\n",
//! );
//! ```
//!
//! ## Permissions
//!
//! Writing under `/etc` requires root. The caller is responsible for
//! privilege elevation.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod conf;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resolv_file;
pub mod util;

pub use config::ResolverConfig;
pub use error::{ResolverError, Result};
pub use platform::{OsRelease, PlatformKind, PlatformProbe};
pub use resolv_file::ResolvFile;
