//! Architecture name mapping
//!
//! Kubernetes release artifacts are published under Go architecture names
//! while `dpkg-buildpackage` expects Debian architecture names. The two
//! disagree for 32-bit ARM and little-endian POWER only.

/// Map a release architecture name to its dpkg name.
///
/// Total: any name without a special case maps to itself.
pub fn to_deb_arch(arch: &str) -> &str {
    match arch {
        "arm" => "armhf",
        "ppc64le" => "ppc64el",
        other => other,
    }
}
