//! Command: print version information.

/// Version line printed by `gene_system version`.
#[must_use]
pub fn version_line() -> String {
    option_env!("GENE_SYSTEM_COMMIT").map_or_else(
        || format!("{} {}", crate::ENGINE_ID, crate::ENGINE_VERSION),
        |commit| format!("{} {} ({commit})", crate::ENGINE_ID, crate::ENGINE_VERSION),
    )
}

/// Print the engine version to stdout.
pub fn run() {
    println!("{}", version_line());
}
