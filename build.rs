// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=STILLCAM_VERSION");

    // Packagers can pin the version instead of asking git
    let version = std::env::var("STILLCAM_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Build a version string of the form `<manifest version>[-<short hash>][-dirty]`
fn describe_version() -> String {
    let base = env!("CARGO_PKG_VERSION");

    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) else {
        return base.to_string();
    };

    // `git describe` only succeeds with a matching tag; an exact tag match
    // has no "-<n>-g<hash>" suffix
    let on_tag = git(&["describe", "--tags", "--exact-match", "--match", "v*"]).is_some();
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|out| !out.is_empty())
        .unwrap_or(false);

    let mut version = format!("{}-{}", base, hash);
    if !on_tag || dirty {
        version.push_str("-dirty");
    }
    version
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
