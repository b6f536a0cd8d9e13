// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=POSEGRID_VERSION");

    // Packagers can pin the version explicitly
    let version = if let Ok(v) = std::env::var("POSEGRID_VERSION") {
        v
    } else {
        get_git_version()
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

fn get_git_version() -> String {
    // "v0.1.0" at a tag, "v0.1.0-5-gabcdef1" after it
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output();

    let version = match output {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => return env_version_with_hash(),
    };

    let version = version.strip_prefix('v').unwrap_or(&version);
    let commit_hash = get_commit_hash().unwrap_or_else(|| "unknown".to_string());

    if version.contains('-') {
        let parts: Vec<&str> = version.rsplitn(3, '-').collect();
        if parts.len() >= 3 {
            let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
            format!("{}-dirty-{}", parts[2], hash)
        } else {
            version.to_string()
        }
    } else if version.chars().all(|c| c.is_ascii_hexdigit()) {
        // No tags yet, describe fell back to the bare hash
        format!("{}-{}", env!("CARGO_PKG_VERSION"), version)
    } else {
        format!("{}-{}", version, commit_hash)
    }
}

/// Outside a git checkout (e.g. a source tarball) fall back to the crate version.
fn env_version_with_hash() -> String {
    match get_commit_hash() {
        Some(hash) => format!("{}-{}", env!("CARGO_PKG_VERSION"), hash),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn get_commit_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
