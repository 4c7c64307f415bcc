//! External command execution.

use anyhow::{Context, Result, bail};
use std::process::Command;

/// Runs a command and returns its trimmed stdout. Fails if the command exits
/// non-zero.
///
/// # Errors
///
/// Returns an error if the program cannot be spawned, or one carrying the
/// exit code and stderr if it exits non-zero.
pub fn run(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to execute: {program}"))?;
    if !output.status.success() {
        bail!(
            "{program} failed (exit {}): {}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if a program is available on PATH.
#[must_use]
pub fn which(program: &str) -> bool {
    ::which::which(program).is_ok()
}

/// Regenerates `/etc/resolv.conf` from the `resolvconf` fragments.
///
/// Skipped (returning `Ok(false)`) when `resolvconf` is not installed.
///
/// # Errors
///
/// Returns an error if `resolvconf -u` fails.
pub fn refresh_resolvconf() -> Result<bool> {
    if !which("resolvconf") {
        tracing::debug!("resolvconf not on PATH, skipping refresh");
        return Ok(false);
    }
    let output = run("resolvconf", &["-u"])?;
    if output.is_empty() {
        tracing::info!("Regenerated resolv.conf via resolvconf -u");
    } else {
        tracing::info!(%output, "Regenerated resolv.conf via resolvconf -u");
    }
    Ok(true)
}
