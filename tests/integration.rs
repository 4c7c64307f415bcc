//! Integration tests for `pygmy-resolv`.
//!
//! Tests marked `#[ignore]` edit the real resolver file and require root:
//!
//! ```bash
//! sudo cargo test -- --ignored
//! ```

use pygmy_resolv::{PlatformKind, PlatformProbe, ResolvFile, ResolverConfig, ResolverError};
use std::path::Path;

const ENTRY: &str = "nameserver 127.0.0.1 # managed by pygmy";

const UBUNTU: &str = "
# Dynamic resolv.conf(5) file for glibc resolver(3) generated by resolvconf(8)
#     DO NOT EDIT THIS FILE BY HAND -- YOUR CHANGES WILL BE OVERWRITTEN
nameserver 10.0.34.17
nameserver 10.0.34.16
nameserver 10.0.201.16
search corp.example.com";

const FEDORA: &str = "
#@VPNC_GENERATED@ -- this file is generated by vpnc
# and will be overwritten by vpnc
# as long as the above mark is intact
# Generated by NetworkManager
search lan corp.example.com
nameserver 10.0.34.17";

const FEDORA_ALT: &str = "# Generated by NetworkManager\nsearch lan\nnameserver 192.168.11.1\n";

/// Independent flags, as a derivative distribution might report them.
struct Flags {
    ubuntu: bool,
    fedora: bool,
    arch: bool,
}

impl PlatformProbe for Flags {
    fn is_ubuntu(&self) -> bool {
        self.ubuntu
    }
    fn is_fedora(&self) -> bool {
        self.fedora
    }
    fn is_arch(&self) -> bool {
        self.arch
    }
}

fn samples() -> [&'static str; 6] {
    [
        UBUNTU,
        FEDORA,
        FEDORA_ALT,
        "# some comments\n    # more comments\n",
        "\n",
        "",
    ]
}

fn resolv_at(path: &Path, kind: PlatformKind) -> ResolvFile {
    ResolvFile::with_probe(ResolverConfig::default().with_resolv_file(path), kind)
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

#[test]
fn platform_specific_paths() {
    let config = ResolverConfig::default()
        .with_common_file("/srv/common/resolv.conf")
        .with_ubuntu_file("/srv/ubuntu/head");

    let expected = [
        (PlatformKind::Ubuntu, "/srv/ubuntu/head"),
        (PlatformKind::Fedora, "/srv/common/resolv.conf"),
        (PlatformKind::Arch, "/srv/common/resolv.conf"),
    ];
    for (kind, path) in expected {
        let r = ResolvFile::with_probe(config.clone(), kind);
        assert_eq!(r.resolv_file().unwrap(), Path::new(path), "{kind}");
    }
}

#[test]
fn ubuntu_wins_when_flags_overlap() {
    let config = ResolverConfig::default()
        .with_common_file("/srv/common/resolv.conf")
        .with_ubuntu_file("/srv/ubuntu/head");
    let r = ResolvFile::with_probe(
        config,
        Flags {
            ubuntu: true,
            fedora: true,
            arch: false,
        },
    );
    assert_eq!(r.platform(), PlatformKind::Ubuntu);
    assert_eq!(r.resolv_file().unwrap(), Path::new("/srv/ubuntu/head"));
}

#[test]
fn unknown_platform_follows_file_existence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thisfiledefinitelydoesnotexist.noexist");
    let r = resolv_at(&path, PlatformKind::Unknown);

    std::fs::write(&path, "").unwrap();
    assert_eq!(r.resolv_file().unwrap(), path);

    std::fs::remove_file(&path).unwrap();
    let err = r.resolv_file().unwrap_err();
    assert!(matches!(err, ResolverError::LocationNotFound { .. }));
    assert!(err.to_string().to_lowercase().contains("unable to determine location of resolv file"));

    // Nothing is created on the way out.
    assert!(r.configure().is_err());
    assert!(r.clean().is_err());
    assert!(!path.exists());
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[test]
fn adds_the_nameserver_once_and_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resolv.conf");
    let r = resolv_at(&path, PlatformKind::Fedora);

    for contents in samples() {
        std::fs::write(&path, contents).unwrap();
        assert!(!r.has_our_nameserver().unwrap());

        r.configure().unwrap();
        r.configure().unwrap();

        assert!(r.has_our_nameserver().unwrap());
        let after = String::from_utf8(r.resolv_file_contents().unwrap()).unwrap();
        assert_eq!(after.lines().next(), Some(ENTRY));
        assert_eq!(after.lines().filter(|l| l.contains("pygmy")).count(), 1);
        assert_eq!(after, format!("{ENTRY}\n{contents}"));
    }
}

#[test]
fn cleans_up_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resolv.conf");
    let r = resolv_at(&path, PlatformKind::Arch);

    for contents in samples() {
        std::fs::write(&path, contents).unwrap();
        r.configure().unwrap();
        r.clean().unwrap();
        r.clean().unwrap();

        assert!(!r.has_our_nameserver().unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
        assert_eq!(r.resolv_file_contents().unwrap(), contents.as_bytes());
    }
}

#[test]
fn corporate_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resolv.conf");
    let original = "nameserver 10.0.34.17\nsearch corp.example.com\n";
    std::fs::write(&path, original).unwrap();
    let r = resolv_at(&path, PlatformKind::Fedora);

    r.configure().unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{ENTRY}\n{original}")
    );

    r.clean().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn empty_file_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("head");
    std::fs::write(&path, "").unwrap();
    let r = resolv_at(&path, PlatformKind::Ubuntu);

    r.configure().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{ENTRY}\n"));

    r.clean().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn entry_pushed_down_by_dhcp_returns_to_top() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resolv.conf");
    std::fs::write(&path, "search lan\nnameserver 192.168.11.1\n").unwrap();
    let r = resolv_at(&path, PlatformKind::Fedora);
    r.configure().unwrap();

    // A DHCP client rewrites the file with its own nameserver first.
    std::fs::write(
        &path,
        format!("nameserver 192.168.11.1\n{ENTRY}\nsearch lan\n"),
    )
    .unwrap();
    assert_eq!(r.nameservers().unwrap(), vec!["192.168.11.1", "127.0.0.1"]);

    assert!(r.configure().unwrap());
    assert_eq!(r.nameservers().unwrap(), vec!["127.0.0.1", "192.168.11.1"]);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{ENTRY}\nnameserver 192.168.11.1\nsearch lan\n")
    );
    assert!(!r.configure().unwrap());
}

#[test]
fn latin1_comments_survive_configure_and_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resolv.conf");
    let original: &[u8] = b"# Serveur DNS de l'entreprise (r\xe9seau interne)\nnameserver 10.0.34.17\n";
    std::fs::write(&path, original).unwrap();
    let r = resolv_at(&path, PlatformKind::Arch);

    assert!(r.configure().unwrap());
    assert!(r.has_our_nameserver().unwrap());
    let configured = std::fs::read(&path).unwrap();
    assert_eq!(configured, [format!("{ENTRY}\n").as_bytes(), original].concat());

    assert!(r.clean().unwrap());
    assert_eq!(std::fs::read(&path).unwrap(), original);
}

#[test]
fn custom_nameserver_and_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resolv.conf");
    std::fs::write(&path, FEDORA_ALT).unwrap();
    let config = ResolverConfig::new("172.17.0.1")
        .with_marker("# added by dory")
        .with_resolv_file(&path);
    let r = ResolvFile::with_probe(config, PlatformKind::Fedora);

    r.configure().unwrap();
    assert_eq!(r.nameservers().unwrap(), vec!["172.17.0.1", "192.168.11.1"]);
    assert!(
        std::fs::read_to_string(&path)
            .unwrap()
            .starts_with("nameserver 172.17.0.1 # added by dory\n")
    );

    // A different marker does not touch our line.
    let other = resolv_at(&path, PlatformKind::Fedora);
    assert!(!other.clean().unwrap());

    r.clean().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), FEDORA_ALT);
}

#[test]
fn symlinked_resolv_conf_keeps_link() {
    let dir = tempfile::tempdir().unwrap();
    let stub = dir.path().join("stub-resolv.conf");
    let link = dir.path().join("resolv.conf");
    std::fs::write(&stub, "nameserver 127.0.0.53\noptions edns0 trust-ad\n").unwrap();
    std::os::unix::fs::symlink(&stub, &link).unwrap();
    let r = resolv_at(&link, PlatformKind::Arch);

    r.configure().unwrap();
    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert!(std::fs::read_to_string(&stub).unwrap().starts_with(ENTRY));

    r.clean().unwrap();
    assert_eq!(
        std::fs::read_to_string(&stub).unwrap(),
        "nameserver 127.0.0.53\noptions edns0 trust-ad\n"
    );
}

// ---------------------------------------------------------------------------
// Root-only tests
// ---------------------------------------------------------------------------

#[test]
#[ignore = "requires root to write the system resolver file"]
fn real_configure_and_clean() {
    let r = ResolvFile::new(ResolverConfig::default());
    let before = r.resolv_file_contents().unwrap();

    r.configure().unwrap();
    assert!(r.has_our_nameserver().unwrap());

    r.clean().unwrap();
    assert_eq!(r.resolv_file_contents().unwrap(), before);
}
