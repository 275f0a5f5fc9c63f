//! Version and build information for nuxt-lens
//!
//! Build metadata (commit SHA, build date, rustc version) is injected by
//! `build.rs` and falls back to "unknown".

/// Full version string.
///
/// Returns format: "nuxt-lens {version} ({commit} {date}) rustc {rustc_version}"
pub fn version() -> String {
    format!(
        "nuxt-lens {} ({} {}) rustc {}",
        package_version(),
        build_commit(),
        build_date(),
        rustc_version()
    )
}

/// Package version (e.g., "0.4.0")
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn build_commit() -> &'static str {
    option_env!("NUXT_LENS_COMMIT_SHA").unwrap_or("unknown")
}

pub fn build_date() -> &'static str {
    option_env!("NUXT_LENS_BUILD_DATE").unwrap_or("unknown")
}

pub fn rustc_version() -> &'static str {
    option_env!("NUXT_LENS_RUSTC_VERSION").unwrap_or("unknown")
}
