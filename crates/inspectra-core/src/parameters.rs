//! Run parameters and lock status for one inspection run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reference to an externally supplied companion plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRef {
    /// Plugin name as reported by the host plugin registry
    pub name: String,
    /// Directory the plugin artifact was unpacked into
    pub directory: PathBuf,
}

impl PluginRef {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
        }
    }
}

/// Everything one run of the inspection runner needs.
///
/// Immutable once constructed and owned exclusively by one runner
/// invocation. `child` is opaque to the lifecycle controller and handed
/// through to the analysis callback untouched.
#[derive(Debug, Clone)]
pub struct RunParameters<T> {
    /// Platform version label (diagnostic only)
    pub idea_version: String,
    /// Installation directory of the platform build
    pub idea_home_directory: PathBuf,
    /// Root under which per-build system directories are allocated
    pub idea_system_directory: PathBuf,
    /// Companion plugins that must be loaded and compatible
    pub plugins: Vec<PluginRef>,
    /// Directory containing the project to analyze
    pub project_dir: PathBuf,
    /// Project name (descriptor file stem)
    pub project_name: String,
    /// Name of the module whose dependency graph is classified
    pub module_name: String,
    /// Parameters for the external analysis callback
    pub child: T,
}

/// Outcome of a single lock acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// Lock newly acquired by this call
    Free,
    /// Held by another process
    Used,
    /// Already held by this process; terminal, never retried
    Skip,
}
