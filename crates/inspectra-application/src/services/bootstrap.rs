//! Platform bootstrap
//!
//! Brings a headless host application instance up for one run: resolves the
//! build configuration, allocates the exclusive system directory, writes the
//! process-global platform properties, launches (or reuses) the instance,
//! verifies companion plugins and fills the JDK table.
//!
//! The underlying platform supports at most one live instance per OS
//! process. The running instance is therefore kept in a process-wide slot;
//! a second bootstrap in the same process reuses it after verifying the
//! requested home directory matches.

use inspectra_config::constants::{
    runtime_home_env_var, DISABLED_COMPANION_PLUGINS, ENV_JAVA_HOME, JDK_VERSION_TAGS,
    PLATFORM_PREFIX, PROP_COMPATIBLE_BUILD, PROP_HEADLESS, PROP_HOME_PATH, PROP_PLATFORM_PREFIX,
    PROP_PLUGINS_PATH, PROP_SYSTEM_PATH, RUNTIME_HOME_MARKER,
};
use inspectra_config::paths;
use inspectra_core::{BuildConfiguration, Error, PluginRef, Result, RunParameters};
use inspectra_ports::{
    ApplicationRef, CompatibilityCheckerRef, LaunchSpec, LauncherRef,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::lock_manager::SystemLock;
use super::system_path::SystemPathAllocator;

/// Process-wide slot for the single live application instance.
fn application_slot() -> &'static Mutex<Option<ApplicationRef>> {
    static SLOT: OnceLock<Mutex<Option<ApplicationRef>>> = OnceLock::new();
    SLOT.get_or_init(|| Mutex::new(None))
}

/// The application instance currently running in this process, if any.
pub async fn running_application() -> Option<ApplicationRef> {
    application_slot().lock().await.clone()
}

/// Remove and return the running application instance.
pub(crate) async fn take_running_application() -> Option<ApplicationRef> {
    application_slot().lock().await.take()
}

#[cfg(test)]
pub(crate) async fn reset_running_application() {
    application_slot().lock().await.take();
}

/// Configures the process and brings the host application online.
pub struct ApplicationBootstrapper {
    launcher: LauncherRef,
    compatibility: CompatibilityCheckerRef,
    allocator: SystemPathAllocator,
}

impl ApplicationBootstrapper {
    pub fn new(launcher: LauncherRef, compatibility: CompatibilityCheckerRef) -> Self {
        Self {
            launcher,
            compatibility,
            allocator: SystemPathAllocator::new(),
        }
    }

    /// Replace the default allocator (tests, constrained environments).
    pub fn with_allocator(mut self, allocator: SystemPathAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Bootstrap the platform for one run.
    ///
    /// The system lock is stored into `lock_slot` the moment it exists, so
    /// the caller's finalization can release it even when a later bootstrap
    /// step fails.
    ///
    /// # Errors
    ///
    /// All fatal conditions surface as [`Error::Bootstrap`] with a
    /// human-readable reason; there are no retries at this layer.
    #[instrument(skip_all, fields(home = %parameters.idea_home_directory.display()))]
    pub async fn bootstrap<T>(
        &self,
        parameters: &RunParameters<T>,
        lock_slot: &mut Option<SystemLock>,
    ) -> Result<ApplicationRef> {
        let config = read_build_configuration(&parameters.idea_home_directory)?;
        info!(
            build = %config.build_number,
            version = %parameters.idea_version,
            "platform build resolved"
        );
        if config.uses_ultimate {
            return Err(Error::bootstrap(
                "the ultimate platform variant is not supported",
            ));
        }

        let (system_path, lock) = self.allocator.allocate(
            &parameters.idea_system_directory,
            &config.build_number,
            config.uses_ultimate,
        )?;
        *lock_slot = Some(lock);

        configure_platform_properties(parameters, &config, &system_path)?;

        let mut slot = application_slot().lock().await;
        if let Some(app) = slot.as_ref() {
            let running_home = app.home_path();
            if running_home != parameters.idea_home_directory {
                return Err(Error::bootstrap(format!(
                    "a platform instance is already running from {}, cannot start another from {}",
                    running_home.display(),
                    parameters.idea_home_directory.display()
                )));
            }
            info!(home = %running_home.display(), "reusing the running platform instance");
            return Ok(Arc::clone(app));
        }

        info!(
            home = %parameters.idea_home_directory.display(),
            system = %system_path.display(),
            "launching headless platform instance"
        );
        let app = self
            .launcher
            .launch(LaunchSpec {
                home_directory: parameters.idea_home_directory.clone(),
                system_path,
                disabled_plugins: DISABLED_COMPANION_PLUGINS
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
            })
            .await?;

        verify_plugins(&app, &parameters.plugins, &self.compatibility)?;
        app.load().await?;
        configure_jdk_table(&app, |name| std::env::var(name).ok()).await?;

        *slot = Some(Arc::clone(&app));
        Ok(app)
    }
}

/// Read and parse the build descriptor under the platform home directory.
///
/// A missing descriptor is not an error: the default build configuration is
/// assumed. Any other read failure is fatal.
fn read_build_configuration(home_directory: &Path) -> Result<BuildConfiguration> {
    let path = paths::build_descriptor_path(home_directory);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(BuildConfiguration::parse(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "build descriptor missing, assuming default build");
            Ok(BuildConfiguration::default())
        }
        Err(e) => Err(Error::Io {
            context: format!("cannot read build descriptor {}", path.display()),
            source: e,
        }),
    }
}

/// Write the process-global properties the platform reads at startup.
fn configure_platform_properties<T>(
    parameters: &RunParameters<T>,
    config: &BuildConfiguration,
    system_path: &Path,
) -> Result<()> {
    let plugin_path =
        std::env::join_paths(parameters.plugins.iter().map(|p| p.directory.as_os_str()))
            .map_err(|e| {
                Error::bootstrap(format!("invalid plugin directory on the search path: {}", e))
            })?;

    std::env::set_var(PROP_HOME_PATH, &parameters.idea_home_directory);
    std::env::set_var(PROP_HEADLESS, "true");
    std::env::set_var(PROP_COMPATIBLE_BUILD, &config.build_number);
    std::env::set_var(PROP_SYSTEM_PATH, system_path);
    std::env::set_var(PROP_PLUGINS_PATH, &plugin_path);
    std::env::set_var(PROP_PLATFORM_PREFIX, PLATFORM_PREFIX);
    Ok(())
}

/// Verify every externally supplied plugin is loaded and compatible.
fn verify_plugins(
    app: &ApplicationRef,
    plugins: &[PluginRef],
    compatibility: &CompatibilityCheckerRef,
) -> Result<()> {
    let enabled = app.enabled_plugins();
    // The disabled list is enumerated as well even though only the count is
    // used: the host finishes initializing its plugin registry only after
    // both queries have run.
    let disabled = app.disabled_plugins();
    debug!(
        enabled = enabled.len(),
        disabled = disabled.len(),
        "companion plugins enumerated"
    );

    let host = app.version();
    for reference in plugins {
        let descriptor = enabled
            .iter()
            .find(|p| p.name == reference.name)
            .ok_or_else(|| Error::bootstrap(format!("{} not loaded", reference.name)))?;

        if app.is_plugin_incompatible(descriptor) {
            return Err(Error::bootstrap(format!(
                "plugin {} is incompatible with the running platform",
                descriptor.name
            )));
        }

        if let Some(reason) = compatibility.incompatibility_reason(descriptor, &host) {
            return Err(Error::bootstrap(reason));
        }
        debug!(plugin = %descriptor.name, version = %descriptor.version, "companion plugin verified");
    }
    Ok(())
}

/// Fill missing JDK table entries from the environment.
async fn configure_jdk_table(
    app: &ApplicationRef,
    env: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    for tag in JDK_VERSION_TAGS {
        if app.jdk_home(tag).is_some() {
            continue;
        }
        match resolve_runtime_home(tag, &env) {
            Some(home) => {
                info!(tag, home = %home.display(), "registering runtime home");
                app.register_jdk(tag, &home).await?;
            }
            None => debug!(tag, "no runtime home found in the environment"),
        }
    }
    Ok(())
}

/// Resolve a runtime home for a version tag.
///
/// The dedicated per-tag variable wins; the generic home variable counts
/// only when its value names both the version tag and a runtime home.
fn resolve_runtime_home(tag: &str, env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(home) = env(&runtime_home_env_var(tag)) {
        return Some(PathBuf::from(home));
    }
    let generic = env(ENV_JAVA_HOME)?;
    if generic.contains(tag) && generic.to_lowercase().contains(RUNTIME_HOME_MARKER) {
        Some(PathBuf::from(generic))
    } else {
        None
    }
}
