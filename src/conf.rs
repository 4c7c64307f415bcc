//! `resolv.conf(5)` line model and the in-memory edits applied to it.
//!
//! Edits work on whole lines of raw bytes: every line not owned by us is
//! carried over byte-for-byte, including its terminator, whatever its
//! encoding.

/// Classification of a single resolver file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `nameserver <address>`.
    Nameserver { address: String },
    /// `search <domain> [<domain>...]`.
    Search { domains: Vec<String> },
    /// Comments, blank lines, and directives we don't interpret.
    Other,
}

/// Parses one line (with or without its terminator).
///
/// Like glibc, values stop at the first `#` or `;`.
#[must_use]
pub fn parse_line(line: &str) -> Directive {
    let body = line.split(['#', ';']).next().unwrap_or_default();
    let mut tokens = body.split_whitespace();
    match tokens.next() {
        Some("nameserver") => tokens.next().map_or(Directive::Other, |address| {
            Directive::Nameserver {
                address: address.to_string(),
            }
        }),
        Some("search") => {
            let domains: Vec<String> = tokens.map(String::from).collect();
            if domains.is_empty() {
                Directive::Other
            } else {
                Directive::Search { domains }
            }
        }
        _ => Directive::Other,
    }
}

/// Lines of `contents`, each with its `\n` terminator (if any).
fn lines(contents: &[u8]) -> impl Iterator<Item = &[u8]> {
    contents.split_inclusive(|b| *b == b'\n')
}

/// Nameserver addresses in file order.
#[must_use]
pub fn nameservers(contents: &[u8]) -> Vec<String> {
    lines(contents)
        .filter_map(|line| match parse_line(&String::from_utf8_lossy(line)) {
            Directive::Nameserver { address } => Some(address),
            _ => None,
        })
        .collect()
}

/// Returns `true` if `line` is a `nameserver` directive tagged with `marker`,
/// whatever its address.
#[must_use]
pub fn is_managed(line: &[u8], marker: &str) -> bool {
    let Some(rest) = line.trim_ascii().strip_suffix(marker.as_bytes()) else {
        return false;
    };
    rest.last().is_some_and(u8::is_ascii_whitespace)
        && matches!(
            parse_line(&String::from_utf8_lossy(rest)),
            Directive::Nameserver { .. }
        )
}

/// Returns `true` if `contents` holds `entry` as a complete line.
#[must_use]
pub fn has_entry(contents: &[u8], entry: &str) -> bool {
    let entry = entry.trim().as_bytes();
    lines(contents).any(|line| line.trim_ascii() == entry)
}

/// Places `entry` as the first line, dropping any other lines tagged with
/// `marker` (stale addresses, duplicates, or our own line pushed down by
/// another editor).
///
/// Returns `None` when `entry` is already the first line and the only
/// tagged one.
#[must_use]
pub fn insert_entry(contents: &[u8], entry: &str, marker: &str) -> Option<Vec<u8>> {
    let entry = entry.trim().as_bytes();
    let first_is_entry = lines(contents)
        .next()
        .is_some_and(|line| line.trim_ascii() == entry);
    if first_is_entry && lines(contents).filter(|line| is_managed(line, marker)).count() == 1 {
        return None;
    }

    let rest = remove_entries(contents, marker);
    let rest = rest.as_deref().unwrap_or(contents);
    let mut updated = Vec::with_capacity(entry.len() + 1 + rest.len());
    updated.extend_from_slice(entry);
    updated.push(b'\n');
    updated.extend_from_slice(rest);
    Some(updated)
}

/// Drops every line tagged with `marker`.
///
/// Returns `None` when there is nothing to remove.
#[must_use]
pub fn remove_entries(contents: &[u8], marker: &str) -> Option<Vec<u8>> {
    let mut removed = false;
    let mut kept = Vec::with_capacity(contents.len());
    for line in lines(contents) {
        if is_managed(line, marker) {
            removed = true;
        } else {
            kept.extend_from_slice(line);
        }
    }
    removed.then_some(kept)
}
