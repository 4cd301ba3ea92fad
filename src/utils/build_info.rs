//! What `version` reports about this binary.

use std::env::consts::{ARCH, OS};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short commit hash, suffixed `+local` for builds with uncommitted edits.
pub const COMMIT: &str = match option_env!("SPENDBOOK_COMMIT") {
    Some(commit) => commit,
    None => "unreleased",
};

pub const BUILD_DATE: &str = match option_env!("SPENDBOOK_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

pub fn platform() -> String {
    format!("{OS}/{ARCH}")
}

/// One-line banner, e.g. `spendbook 0.1.0 (3f2a9c1, built 2024-05-01)`.
pub fn banner() -> String {
    format!("spendbook {VERSION} ({COMMIT}, built {BUILD_DATE})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_version_and_commit() {
        let banner = banner();
        assert!(banner.starts_with(&format!("spendbook {VERSION} (")));
        assert!(banner.contains(COMMIT));
        assert!(platform().contains('/'));
    }
}
