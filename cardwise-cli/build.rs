use std::process::Command;

/// Short git sha of the workspace, or "unknown" outside a checkout.
fn git_sha(repo_root: &str) -> String {
    Command::new("git")
        .args(["-C", repo_root, "rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = format!("{}/..", manifest_dir);

    println!("cargo:rerun-if-changed={}/.git/HEAD", repo_root);
    println!("cargo:rustc-env=CARDWISE_BUILD_SHA={}", git_sha(&repo_root));
}
