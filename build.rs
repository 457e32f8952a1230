//! Build script: embeds the git commit hash as `GENE_SYSTEM_COMMIT`.

use std::process::Command;

fn main() {
    // Prefer GENE_SYSTEM_COMMIT if set (e.g., by a release workflow),
    // otherwise fall back to git for local development builds.
    if let Ok(commit) = std::env::var("GENE_SYSTEM_COMMIT") {
        println!("cargo:rustc-env=GENE_SYSTEM_COMMIT={commit}");
    } else if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        && output.status.success()
    {
        let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GENE_SYSTEM_COMMIT={commit}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=GENE_SYSTEM_COMMIT");
}
