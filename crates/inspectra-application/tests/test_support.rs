use async_trait::async_trait;
use inspectra_application::ports::{
    ApplicationRef, DependencyScope, HostApplication, HostLauncher, LaunchSpec, LibraryHandle,
    LibraryRef, ModuleDependency, ModuleHandle, ModuleRef, ProjectHandle, ProjectRef,
};
use inspectra_core::{HostVersion, PluginDescriptor, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Serializes tests in this binary: the runner token, the application slot
/// and the platform properties are process-wide.
pub fn process_guard() -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    match GUARD.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub struct StubLibrary {
    urls: Vec<String>,
}

impl StubLibrary {
    pub fn new(urls: &[&str]) -> LibraryRef {
        Arc::new(Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
        })
    }
}

impl LibraryHandle for StubLibrary {
    fn name(&self) -> String {
        "stub".to_string()
    }

    fn classpath_urls(&self) -> Vec<String> {
        self.urls.clone()
    }
}

pub struct StubModule {
    name: String,
    dependencies: Vec<ModuleDependency>,
}

impl StubModule {
    pub fn with_library(name: &str, library: LibraryRef) -> ModuleRef {
        Arc::new(Self {
            name: name.to_string(),
            dependencies: vec![ModuleDependency::Library {
                library,
                scope: DependencyScope::Compile,
                exported: false,
            }],
        })
    }
}

impl ModuleHandle for StubModule {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn dependencies(&self) -> Vec<ModuleDependency> {
        self.dependencies.clone()
    }
}

pub struct StubProject {
    name: String,
    modules: Vec<ModuleRef>,
}

impl StubProject {
    pub fn new(name: &str, modules: Vec<ModuleRef>) -> ProjectRef {
        Arc::new(Self {
            name: name.to_string(),
            modules,
        })
    }
}

impl ProjectHandle for StubProject {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn modules(&self) -> Vec<ModuleRef> {
        self.modules.clone()
    }
}

impl std::fmt::Debug for StubProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubProject")
            .field("name", &self.name)
            .field("modules", &self.modules.len())
            .finish()
    }
}

/// A project with one JVM module named "app".
pub fn jvm_project() -> ProjectRef {
    let stdlib = StubLibrary::new(&["jar:///repo/kotlin-stdlib-1.1.60.jar!/"]);
    StubProject::new("sample", vec![StubModule::with_library("app", stdlib)])
}

pub struct StubApplication {
    home: PathBuf,
    enabled: Vec<PluginDescriptor>,
    project: Option<ProjectRef>,
    exited: AtomicBool,
}

impl StubApplication {
    pub fn new(home: &Path, enabled: Vec<PluginDescriptor>, project: Option<ProjectRef>) -> Arc<Self> {
        Arc::new(Self {
            home: home.to_path_buf(),
            enabled,
            project,
            exited: AtomicBool::new(false),
        })
    }

    pub fn was_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for StubApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubApplication")
            .field("home", &self.home)
            .finish()
    }
}

#[async_trait]
impl HostApplication for StubApplication {
    fn home_path(&self) -> PathBuf {
        self.home.clone()
    }

    fn version(&self) -> HostVersion {
        HostVersion::new("2017.1", "171.4249.32")
    }

    fn enabled_plugins(&self) -> Vec<PluginDescriptor> {
        self.enabled.clone()
    }

    fn disabled_plugins(&self) -> Vec<PluginDescriptor> {
        Vec::new()
    }

    fn is_plugin_incompatible(&self, _plugin: &PluginDescriptor) -> bool {
        false
    }

    async fn load(&self) -> Result<()> {
        Ok(())
    }

    fn jdk_home(&self, _version_tag: &str) -> Option<PathBuf> {
        // Every tag reports an entry so bootstrap never reads the environment
        Some(PathBuf::from("/opt/runtimes/jdk"))
    }

    async fn register_jdk(&self, _version_tag: &str, _home: &Path) -> Result<()> {
        Ok(())
    }

    async fn open_project(&self, _descriptor: &Path) -> Result<Option<ProjectRef>> {
        Ok(self.project.clone())
    }

    fn set_abrupt_termination(&self, _enabled: bool) {}

    async fn exit(&self) -> Result<()> {
        self.exited.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct StubLauncher {
    application: ApplicationRef,
    last_spec: Mutex<Option<LaunchSpec>>,
}

impl StubLauncher {
    pub fn new(application: ApplicationRef) -> Arc<Self> {
        Arc::new(Self {
            application,
            last_spec: Mutex::new(None),
        })
    }

    pub fn last_spec(&self) -> Option<LaunchSpec> {
        self.last_spec.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostLauncher for StubLauncher {
    async fn launch(&self, spec: LaunchSpec) -> Result<ApplicationRef> {
        *self.last_spec.lock().unwrap() = Some(spec);
        Ok(Arc::clone(&self.application))
    }
}
