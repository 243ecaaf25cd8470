//! Default constants for the inspection runner
//!
//! This module centralizes the constants used throughout the workspace,
//! providing a single source of truth for default values.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - Filenames: fixed marker and descriptor file names
//! - Limits: retry ceilings
//! - Environment variables: runtime-home discovery
//! - Platform properties: process-global properties the host reads
//! - Plugins: companion plugin block-list

// ============================================================================
// FILENAMES
// ============================================================================

/// Build descriptor file under the platform home directory
pub const BUILD_DESCRIPTOR_FILE_NAME: &str = "build.txt";

/// Lock marker file inside each candidate system directory
pub const SYSTEM_LOCK_FILE_NAME: &str = "system.lock";

/// Project descriptor file extension
pub const PROJECT_FILE_EXTENSION: &str = "ipr";

/// Lock kind label used for system directory locks
pub const SYSTEM_LOCK_KIND: &str = "system";

// ============================================================================
// LIMITS
// ============================================================================

/// Candidate system directories tried before allocation fails.
///
/// Bounds retry cost and surfaces systemic contention instead of looping
/// forever.
pub const MAX_SYSTEM_PATH_ATTEMPTS: u32 = 256;

// ============================================================================
// ENVIRONMENT VARIABLES
// ============================================================================

/// Generic runtime home, accepted only when its value names both the
/// version tag and a runtime home (see [`RUNTIME_HOME_MARKER`])
pub const ENV_JAVA_HOME: &str = "JAVA_HOME";

/// Prefix of the per-version-tag runtime home variables
/// (`JDK_16`, `JDK_17`, `JDK_18`)
pub const ENV_RUNTIME_HOME_PREFIX: &str = "JDK_";

/// Version tags for which JDK table entries are configured
pub const JDK_VERSION_TAGS: &[&str] = &["1.6", "1.7", "1.8"];

/// Word a generic home path must contain to count as a runtime home
pub const RUNTIME_HOME_MARKER: &str = "jdk";

/// Dedicated runtime-home variable name for a version tag,
/// e.g. "1.8" -> "JDK_18".
pub fn runtime_home_env_var(version_tag: &str) -> String {
    format!("{}{}", ENV_RUNTIME_HOME_PREFIX, version_tag.replace('.', ""))
}

// ============================================================================
// PLATFORM PROPERTIES (process-global, read by the host)
// ============================================================================

/// Platform installation directory
pub const PROP_HOME_PATH: &str = "idea.home.path";

/// Headless-UI flag
pub const PROP_HEADLESS: &str = "java.awt.headless";

/// Build number companion plugins are checked against
pub const PROP_COMPATIBLE_BUILD: &str = "idea.plugins.compatible.build";

/// Per-run system (cache/index) directory
pub const PROP_SYSTEM_PATH: &str = "idea.system.path";

/// Search path for externally supplied plugins
pub const PROP_PLUGINS_PATH: &str = "idea.plugins.path";

/// Platform identity prefix
pub const PROP_PLATFORM_PREFIX: &str = "idea.platform.prefix";

/// Value written to [`PROP_PLATFORM_PREFIX`]
pub const PLATFORM_PREFIX: &str = "Idea";

// ============================================================================
// PLUGINS
// ============================================================================

/// Companion plugins disabled at launch; they interfere with headless
/// operation.
pub const DISABLED_COMPANION_PLUGINS: &[&str] = &[
    "org.jetbrains.android",
    "com.android.tools.idea.smali",
    "mobi.hsz.idea.gitignore",
];
