//! Build metadata accessors
//!
//! Includes the `version.rs` generated by the build script so there is a
//! single source for build time and commit.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script, or "unknown"
pub fn git_hash() -> &'static str {
    GIT_HASH
}
