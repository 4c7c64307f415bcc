//! Command-line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use crate::config::ResolverConfig;
use crate::error::ResolverError;
use crate::platform::{OsRelease, PlatformKind};
use crate::resolv_file::ResolvFile;
use crate::{exec, logging, util};

/// Point `*.docker.amazee.io` lookups at the local DNS container by managing a
/// nameserver entry in the system resolver file.
#[derive(Parser, Debug)]
#[command(name = "pygmy-resolv", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Settings file (default: $PYGMY_RESOLV_CONFIG or the per-user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Nameserver address to inject
    #[arg(long, global = true)]
    pub nameserver: Option<String>,

    /// Edit this file instead of the platform's resolver file
    #[arg(long, global = true)]
    pub resolv_file: Option<PathBuf>,

    /// Skip distribution detection
    #[arg(long, global = true, value_enum, default_value_t = PlatformArg::Auto)]
    pub platform: PlatformArg,

    /// Don't run `resolvconf -u` after editing the Ubuntu head file
    #[arg(long, global = true)]
    pub no_refresh: bool,
}

/// Value of `--platform`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    Auto,
    Ubuntu,
    Fedora,
    Arch,
    Unknown,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add the managed nameserver as the first resolver entry
    Configure,
    /// Remove the managed nameserver
    Clean,
    /// Show the resolver file and whether the entry is present
    Status,
}

/// Parse arguments, initialise logging and run the selected command.
///
/// # Errors
///
/// Returns an error if the resolver file cannot be located, read, or written,
/// or the settings are invalid.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(cli.verbose);

    let resolv = build(&cli.global)?;
    let result = execute(cli.command, &cli.global, &resolv, &mut std::io::stdout().lock());
    if let Err(e) = &result {
        let denied = e
            .downcast_ref::<ResolverError>()
            .is_some_and(ResolverError::is_permission_denied);
        if denied && !util::is_root() {
            tracing::warn!("Permission denied; re-run with sudo");
        }
    }
    result
}

/// Builds the resolver file manager from settings and flags.
///
/// # Errors
///
/// Returns an error if the settings file cannot be loaded or the overrides
/// are invalid.
pub fn build(opts: &GlobalOpts) -> Result<ResolvFile> {
    let mut config =
        ResolverConfig::discover(opts.config.as_deref()).context("failed to load settings")?;
    if let Some(ns) = &opts.nameserver {
        config.nameserver.clone_from(ns);
    }
    if let Some(path) = &opts.resolv_file {
        config = config.with_resolv_file(path);
    }
    config.validate()?;

    Ok(match opts.platform {
        PlatformArg::Auto => ResolvFile::with_probe(config, OsRelease::system()),
        PlatformArg::Ubuntu => ResolvFile::with_probe(config, PlatformKind::Ubuntu),
        PlatformArg::Fedora => ResolvFile::with_probe(config, PlatformKind::Fedora),
        PlatformArg::Arch => ResolvFile::with_probe(config, PlatformKind::Arch),
        PlatformArg::Unknown => ResolvFile::with_probe(config, PlatformKind::Unknown),
    })
}

/// Runs `command` against `resolv`, writing the user-facing summary to `out`.
///
/// # Errors
///
/// Returns the underlying [`ResolverError`] (wrapped with context) if the
/// resolver file cannot be located, read, or written.
pub fn execute(
    command: Command,
    opts: &GlobalOpts,
    resolv: &ResolvFile,
    out: &mut impl Write,
) -> Result<()> {
    let nameserver = &resolv.config().nameserver;
    match command {
        Command::Configure => {
            let changed = resolv
                .configure()
                .context("failed to add managed nameserver")?;
            let path = resolv.resolv_file()?;
            if changed {
                writeln!(out, "Added nameserver {nameserver} to {}", path.display())?;
                refresh(resolv, opts);
            } else {
                writeln!(out, "Nameserver {nameserver} already configured in {}", path.display())?;
            }
        }
        Command::Clean => {
            let changed = resolv
                .clean()
                .context("failed to remove managed nameserver")?;
            let path = resolv.resolv_file()?;
            if changed {
                writeln!(out, "Removed nameserver {nameserver} from {}", path.display())?;
                refresh(resolv, opts);
            } else {
                writeln!(out, "No managed nameserver in {}", path.display())?;
            }
        }
        Command::Status => {
            let path = resolv.resolv_file()?;
            let configured = resolv.has_our_nameserver()?;
            let nameservers = resolv.nameservers()?;
            writeln!(out, "platform:    {}", resolv.platform())?;
            writeln!(out, "resolv file: {}", path.display())?;
            writeln!(out, "configured:  {}", if configured { "yes" } else { "no" })?;
            writeln!(out, "nameservers: {}", nameservers.join(", "))?;
        }
    }
    Ok(())
}

/// The Ubuntu head fragment only takes effect once resolvconf regenerates
/// `/etc/resolv.conf`.
fn refresh(resolv: &ResolvFile, opts: &GlobalOpts) {
    if opts.no_refresh || opts.resolv_file.is_some() || resolv.platform() != PlatformKind::Ubuntu {
        return;
    }
    if let Err(e) = exec::refresh_resolvconf() {
        tracing::warn!(error = %e, "Failed to regenerate resolv.conf");
    }
}
