//! Shared mock implementations for service tests

use async_trait::async_trait;
use inspectra_core::{BoxError, Error, HostVersion, PluginDescriptor, Result, RunParameters};
use inspectra_ports::{
    Analyzer, ApplicationRef, CompatibilityChecker, DependencyScope, HostApplication,
    HostLauncher, LaunchSpec, LibraryHandle, LibraryRef, ModuleDependency, ModuleHandle,
    ModuleRef, ProjectHandle, ProjectRef,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Serializes tests that touch process-wide state (the application slot,
/// the runner token, platform properties).
pub fn process_guard() -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    match GUARD.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// =============================================================================
// Project graph mocks
// =============================================================================

pub struct MockLibrary {
    name: String,
    urls: Vec<String>,
}

impl MockLibrary {
    pub fn new(name: &str, urls: &[&str]) -> LibraryRef {
        Arc::new(Self {
            name: name.to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
        })
    }
}

impl LibraryHandle for MockLibrary {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn classpath_urls(&self) -> Vec<String> {
        self.urls.clone()
    }
}

pub struct MockModule {
    name: String,
    dependencies: Mutex<Vec<ModuleDependency>>,
}

impl MockModule {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            dependencies: Mutex::new(Vec::new()),
        })
    }

    pub fn add_library(&self, library: LibraryRef, scope: DependencyScope, exported: bool) {
        self.dependencies.lock().unwrap().push(ModuleDependency::Library {
            library,
            scope,
            exported,
        });
    }

    pub fn add_module(&self, module: ModuleRef, scope: DependencyScope, exported: bool) {
        self.dependencies.lock().unwrap().push(ModuleDependency::Module {
            module,
            scope,
            exported,
        });
    }
}

impl ModuleHandle for MockModule {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn dependencies(&self) -> Vec<ModuleDependency> {
        self.dependencies.lock().unwrap().clone()
    }
}

pub struct MockProject {
    name: String,
    modules: Vec<ModuleRef>,
}

impl MockProject {
    pub fn new(name: &str, modules: Vec<ModuleRef>) -> ProjectRef {
        Arc::new(Self {
            name: name.to_string(),
            modules,
        })
    }
}

impl ProjectHandle for MockProject {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn modules(&self) -> Vec<ModuleRef> {
        self.modules.clone()
    }
}

impl std::fmt::Debug for MockProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProject")
            .field("name", &self.name)
            .field("modules", &self.modules.len())
            .finish()
    }
}

/// A project with a single JVM module named "app".
pub fn sample_project() -> ProjectRef {
    let module = MockModule::new("app");
    module.add_library(
        MockLibrary::new("stdlib", &["jar:///repo/kotlin-stdlib-1.1.60.jar!/"]),
        DependencyScope::Compile,
        false,
    );
    MockProject::new("sample", vec![module as ModuleRef])
}

// =============================================================================
// Host application mocks
// =============================================================================

pub struct MockApplicationBuilder {
    home: PathBuf,
    version: HostVersion,
    enabled: Vec<PluginDescriptor>,
    disabled: Vec<PluginDescriptor>,
    incompatible: Vec<String>,
    project: Option<ProjectRef>,
    jdk_entries: HashMap<String, PathBuf>,
}

impl MockApplicationBuilder {
    pub fn with_enabled_plugin(mut self, plugin: PluginDescriptor) -> Self {
        self.enabled.push(plugin);
        self
    }

    pub fn with_incompatible(mut self, name: &str) -> Self {
        self.incompatible.push(name.to_string());
        self
    }

    pub fn with_project(mut self, project: ProjectRef) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_jdk(mut self, tag: &str, home: &str) -> Self {
        self.jdk_entries.insert(tag.to_string(), PathBuf::from(home));
        self
    }

    pub fn build(self) -> Arc<MockApplication> {
        Arc::new(MockApplication {
            home: self.home,
            version: self.version,
            enabled: self.enabled,
            disabled: self.disabled,
            incompatible: self.incompatible,
            project: self.project,
            jdk_entries: Mutex::new(self.jdk_entries),
            loaded: AtomicBool::new(false),
            exited: AtomicBool::new(false),
            open_count: AtomicUsize::new(0),
            enabled_enumerations: AtomicUsize::new(0),
            disabled_enumerations: AtomicUsize::new(0),
            abrupt_termination_log: Mutex::new(Vec::new()),
        })
    }
}

pub struct MockApplication {
    home: PathBuf,
    version: HostVersion,
    enabled: Vec<PluginDescriptor>,
    disabled: Vec<PluginDescriptor>,
    incompatible: Vec<String>,
    project: Option<ProjectRef>,
    jdk_entries: Mutex<HashMap<String, PathBuf>>,
    loaded: AtomicBool,
    exited: AtomicBool,
    open_count: AtomicUsize,
    enabled_enumerations: AtomicUsize,
    disabled_enumerations: AtomicUsize,
    abrupt_termination_log: Mutex<Vec<bool>>,
}

impl MockApplication {
    pub fn new(home: &Path) -> MockApplicationBuilder {
        MockApplicationBuilder {
            home: home.to_path_buf(),
            version: HostVersion::new("2017.1", "171.4249.32"),
            enabled: Vec::new(),
            disabled: Vec::new(),
            incompatible: Vec::new(),
            project: None,
            jdk_entries: HashMap::new(),
        }
    }

    pub fn was_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    pub fn was_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    pub fn enabled_enumerations(&self) -> usize {
        self.enabled_enumerations.load(Ordering::SeqCst)
    }

    pub fn disabled_enumerations(&self) -> usize {
        self.disabled_enumerations.load(Ordering::SeqCst)
    }

    pub fn abrupt_termination_log(&self) -> Vec<bool> {
        self.abrupt_termination_log.lock().unwrap().clone()
    }

    pub fn registered_jdks(&self) -> HashMap<String, PathBuf> {
        self.jdk_entries.lock().unwrap().clone()
    }
}

impl std::fmt::Debug for MockApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockApplication")
            .field("home", &self.home)
            .field("version", &self.version)
            .finish()
    }
}

#[async_trait]
impl HostApplication for MockApplication {
    fn home_path(&self) -> PathBuf {
        self.home.clone()
    }

    fn version(&self) -> HostVersion {
        self.version.clone()
    }

    fn enabled_plugins(&self) -> Vec<PluginDescriptor> {
        self.enabled_enumerations.fetch_add(1, Ordering::SeqCst);
        self.enabled.clone()
    }

    fn disabled_plugins(&self) -> Vec<PluginDescriptor> {
        self.disabled_enumerations.fetch_add(1, Ordering::SeqCst);
        self.disabled.clone()
    }

    fn is_plugin_incompatible(&self, plugin: &PluginDescriptor) -> bool {
        self.incompatible.contains(&plugin.name)
    }

    async fn load(&self) -> Result<()> {
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn jdk_home(&self, version_tag: &str) -> Option<PathBuf> {
        self.jdk_entries.lock().unwrap().get(version_tag).cloned()
    }

    async fn register_jdk(&self, version_tag: &str, home: &Path) -> Result<()> {
        self.jdk_entries
            .lock()
            .unwrap()
            .insert(version_tag.to_string(), home.to_path_buf());
        Ok(())
    }

    async fn open_project(&self, _descriptor: &Path) -> Result<Option<ProjectRef>> {
        self.open_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.project.clone())
    }

    fn set_abrupt_termination(&self, enabled: bool) {
        self.abrupt_termination_log.lock().unwrap().push(enabled);
    }

    async fn exit(&self) -> Result<()> {
        self.exited.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MockLauncher {
    application: ApplicationRef,
    launches: AtomicUsize,
    last_spec: Mutex<Option<LaunchSpec>>,
}

impl MockLauncher {
    pub fn new(application: ApplicationRef) -> Arc<Self> {
        Arc::new(Self {
            application,
            launches: AtomicUsize::new(0),
            last_spec: Mutex::new(None),
        })
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn last_spec(&self) -> Option<LaunchSpec> {
        self.last_spec.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostLauncher for MockLauncher {
    async fn launch(&self, spec: LaunchSpec) -> Result<ApplicationRef> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        *self.last_spec.lock().unwrap() = Some(spec);
        Ok(Arc::clone(&self.application))
    }
}

// =============================================================================
// Compatibility and analyzer mocks
// =============================================================================

pub struct AlwaysCompatible;

impl CompatibilityChecker for AlwaysCompatible {
    fn incompatibility_reason(
        &self,
        _plugin: &PluginDescriptor,
        _host: &HostVersion,
    ) -> Option<String> {
        None
    }
}

pub enum AnalyzerBehavior {
    Succeed(bool),
    FailForeign(String),
    FailDistinguished(String),
}

pub struct ScriptedAnalyzer {
    behavior: AnalyzerBehavior,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new(behavior: AnalyzerBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer<()> for ScriptedAnalyzer {
    async fn analyze(
        &self,
        _project: ProjectRef,
        _parameters: &(),
    ) -> std::result::Result<bool, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            AnalyzerBehavior::Succeed(verdict) => Ok(*verdict),
            AnalyzerBehavior::FailForeign(message) => {
                Err(Box::new(std::io::Error::other(message.clone())))
            }
            AnalyzerBehavior::FailDistinguished(reason) => {
                Err(Box::new(Error::bootstrap(reason.clone())))
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub struct TestEnv {
    pub temp: tempfile::TempDir,
    pub home: PathBuf,
    pub system_root: PathBuf,
    pub project_dir: PathBuf,
}

/// Platform home, system root and project directory under one tempdir,
/// with an optional build descriptor.
pub fn test_env(build_descriptor: Option<&str>) -> TestEnv {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("platform");
    let system_root = temp.path().join("systems");
    let project_dir = temp.path().join("project");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&system_root).unwrap();
    std::fs::create_dir_all(&project_dir).unwrap();
    if let Some(text) = build_descriptor {
        std::fs::write(home.join("build.txt"), text).unwrap();
    }
    TestEnv {
        temp,
        home,
        system_root,
        project_dir,
    }
}

pub fn run_parameters(env: &TestEnv) -> RunParameters<()> {
    RunParameters {
        idea_version: "2017.1".to_string(),
        idea_home_directory: env.home.clone(),
        idea_system_directory: env.system_root.clone(),
        plugins: Vec::new(),
        project_dir: env.project_dir.clone(),
        project_name: "sample".to_string(),
        module_name: "app".to_string(),
        child: (),
    }
}
