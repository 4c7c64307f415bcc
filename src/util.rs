//! Internal utilities.

use std::io::Write as _;
use std::path::Path;

/// Returns `true` when running with an effective UID of 0.
#[must_use]
pub fn is_root() -> bool {
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Replaces the contents of `path` with `contents` in one rename.
///
/// The data is staged in a uniquely named sibling temp file (same
/// filesystem), given the original file's permissions, synced, and renamed
/// over the target. When `path` is a symlink (e.g. `/etc/resolv.conf` ->
/// systemd-resolved stub), the link target is replaced and the link itself
/// is left alone.
///
/// # Errors
///
/// Returns the underlying I/O error; the temp file is removed on failure.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = target
        .file_name()
        .map_or_else(|| "resolv".into(), |n| n.to_string_lossy().into_owned());

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".pygmy.tmp")
        .tempfile_in(dir)?;
    if let Ok(meta) = std::fs::metadata(&target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
