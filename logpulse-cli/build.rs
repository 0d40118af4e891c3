// Build script to inject version information from git tags
//
// Falls back to CARGO_PKG_VERSION when git is unavailable.

use std::process::Command;

fn main() {
    let version = get_git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=LOGPULSE_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

fn get_git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();

    if let Some(tag) = described.strip_prefix('v') {
        // Clean tag ("v0.1.0") or tag with commit suffix ("v0.1.0-5-gabc123")
        match tag.find('-') {
            Some(dash) => Some(tag[..dash].to_string()),
            None => Some(tag.to_string()),
        }
    } else {
        // No tag reachable: pair the crate version with the commit hash
        Some(format!("{}-{}", env!("CARGO_PKG_VERSION"), described))
    }
}
