//! Embeds the commit and build date shown by `version`.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let commit = match git(&["rev-parse", "--short", "HEAD"]) {
        Some(hash) => {
            let edited = git(&["status", "--porcelain", "--untracked-files=no"])
                .is_some_and(|changes| !changes.is_empty());
            if edited {
                format!("{hash}+local")
            } else {
                hash
            }
        }
        None => "unreleased".to_string(),
    };
    println!("cargo:rustc-env=SPENDBOOK_COMMIT={commit}");
    println!(
        "cargo:rustc-env=SPENDBOOK_BUILD_DATE={}",
        chrono::Utc::now().format("%Y-%m-%d")
    );
}

/// Trimmed stdout of a successful, non-empty git invocation.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
