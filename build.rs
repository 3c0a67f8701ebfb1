use std::process::Command;

/// Exposes `GIT_VERSION` to the crate for the health endpoint.
///
/// A non-empty `GIT_VERSION` in the build environment wins (container and CI
/// builds have no `.git`), then `git describe`, then `"unknown"`.
fn main() {
    println!("cargo:rerun-if-env-changed=GIT_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let version = std::env::var("GIT_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(describe)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_VERSION={}", version);
}

fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}
