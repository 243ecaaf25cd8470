//! Host platform interface
//!
//! Defines the traits through which the runner launches and drives the
//! heavyweight host application. The async methods are marshaled by the
//! implementation onto the host's event execution context; the caller blocks
//! until the marshaled action completes. None of them carry a timeout: a
//! hang in the host blocks the whole run (documented limitation).

use async_trait::async_trait;
use inspectra_core::{HostVersion, PluginDescriptor, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::project::ProjectRef;

/// Thread-safe reference to a running host application
pub type ApplicationRef = Arc<dyn HostApplication + Send + Sync>;

/// Thread-safe reference to a host launcher
pub type LauncherRef = Arc<dyn HostLauncher + Send + Sync>;

/// Everything a launcher needs to bring up a headless instance.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Installation directory of the platform build
    pub home_directory: PathBuf,
    /// Exclusive per-run system directory (already locked by the caller)
    pub system_path: PathBuf,
    /// Companion plugins disabled before startup
    pub disabled_plugins: Vec<String>,
}

/// Starts host application instances.
///
/// Instances are headless and non-interactive; the underlying platform
/// supports at most one live instance per OS process, which the application
/// layer enforces through a process-wide slot.
#[async_trait]
pub trait HostLauncher {
    /// Launch a new headless instance.
    async fn launch(&self, spec: LaunchSpec) -> Result<ApplicationRef>;
}

/// A running host application instance.
#[async_trait]
pub trait HostApplication: std::fmt::Debug {
    /// Installation directory this instance reports running from.
    fn home_path(&self) -> PathBuf;

    /// Version and build of this instance.
    fn version(&self) -> HostVersion;

    /// Companion plugins currently enabled.
    fn enabled_plugins(&self) -> Vec<PluginDescriptor>;

    /// Companion plugins currently disabled.
    ///
    /// The host finishes initializing its plugin registry only once both
    /// the enabled and the disabled list have been enumerated, so callers
    /// must invoke this even when the result is unused.
    fn disabled_plugins(&self) -> Vec<PluginDescriptor>;

    /// Whether the host flags this plugin as incompatible.
    fn is_plugin_incompatible(&self, plugin: &PluginDescriptor) -> bool;

    /// Finish bringing the instance fully online.
    async fn load(&self) -> Result<()>;

    /// Registered JDK table entry for a version tag, if any.
    fn jdk_home(&self, version_tag: &str) -> Option<PathBuf>;

    /// Register a JDK table entry for a version tag.
    async fn register_jdk(&self, version_tag: &str, home: &Path) -> Result<()>;

    /// Open or import the project behind the given descriptor file.
    ///
    /// Returns `None` when the host cannot open the project.
    async fn open_project(&self, descriptor: &Path) -> Result<Option<ProjectRef>>;

    /// Enable or disable the host's abrupt process termination.
    ///
    /// Disabled while an exit request is in flight so the instance shuts
    /// down acknowledged instead of killing the OS process.
    fn set_abrupt_termination(&self, enabled: bool);

    /// Request an irrecoverable exit: forced, no save, no confirmation.
    ///
    /// Completes once the host has acknowledged the request.
    async fn exit(&self) -> Result<()>;
}
