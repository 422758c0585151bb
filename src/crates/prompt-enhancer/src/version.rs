//! Version information for prompt-enhancer
//!
//! Build number, git commit and build timestamp are injected by `build.rs`.

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build number (from CI or default to 0)
pub const BUILD_NUMBER: &str = env!("BUILD_NUMBER");

/// Git commit hash (short form)
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Build timestamp (RFC3339 format)
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

/// Multi-line version text for `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nbuild: ",
    env!("BUILD_NUMBER"),
    "\ncommit: ",
    env!("GIT_COMMIT"),
    "\nbuilt: ",
    env!("BUILD_TIMESTAMP"),
);

/// Full version line
///
/// # Example
///
/// ```
/// use prompt_enhancer::version::full_version;
///
/// assert!(full_version().starts_with("prompt-enhancer v"));
/// ```
pub fn full_version() -> String {
    VersionInfo::get().to_string()
}

/// Version metadata as a struct
#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub version: &'static str,
    pub build_number: &'static str,
    pub git_commit: &'static str,
    pub build_timestamp: &'static str,
}

impl VersionInfo {
    pub fn get() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            git_commit: GIT_COMMIT,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "prompt-enhancer v{} (build {}, commit {}, built {})",
            self.version, self.build_number, self.git_commit, self.build_timestamp
        )
    }
}
