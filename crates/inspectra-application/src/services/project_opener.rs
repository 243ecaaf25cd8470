//! Project open and module classification
//!
//! Opens the project behind a descriptor file on the host's event execution
//! context and classifies the target module by the runtime libraries on its
//! compile-scope dependency closure. Classification is diagnostic: it drives
//! log output and an unsupported-target warning, never control flow.

use inspectra_config::paths;
use inspectra_core::{classification, Error, ModuleClassification, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use inspectra_ports::{
    ApplicationRef, DependencyScope, ModuleDependency, ModuleRef, ProjectRef,
};

/// Opens projects in a running application instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectOpener;

impl ProjectOpener {
    pub fn new() -> Self {
        Self
    }

    /// Open the project and classify the target module.
    ///
    /// # Errors
    ///
    /// [`Error::ProjectOpen`] when the host cannot open the descriptor.
    #[instrument(skip_all, fields(project = project_name, module = module_name))]
    pub async fn open(
        &self,
        app: &ApplicationRef,
        project_dir: &Path,
        project_name: &str,
        module_name: &str,
    ) -> Result<ProjectRef> {
        let descriptor = paths::project_descriptor_path(project_dir, project_name);
        let project = app
            .open_project(&descriptor)
            .await?
            .ok_or_else(|| Error::ProjectOpen {
                path: descriptor.clone(),
            })?;

        let modules = project.modules();
        info!(
            project = %project.name(),
            modules = modules.len(),
            "project opened"
        );

        for module in &modules {
            if module.name() != module_name {
                continue;
            }
            let kind = classify_module(module);
            info!(module = %module.name(), %kind, "module classified");
            if !kind.analysis_supported() {
                warn!(
                    module = %module.name(),
                    %kind,
                    "module targets an unsupported analysis platform"
                );
            }
        }

        Ok(project)
    }
}

/// Classify a module from its compile-scope dependency closure.
pub(crate) fn classify_module(module: &ModuleRef) -> ModuleClassification {
    classification::classify_classpath(exported_compile_classpath(module))
}

/// Classpath URLs reachable over compile-scope edges.
///
/// All direct edges of the root count; transitivity continues only through
/// exported edges.
fn exported_compile_classpath(root: &ModuleRef) -> Vec<String> {
    let mut urls = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(root.name());

    let mut queue: Vec<(ModuleRef, bool)> = vec![(Arc::clone(root), true)];
    while let Some((module, is_root)) = queue.pop() {
        for dependency in module.dependencies() {
            match dependency {
                ModuleDependency::Library {
                    library,
                    scope,
                    exported,
                } => {
                    if scope != DependencyScope::Compile {
                        continue;
                    }
                    if !is_root && !exported {
                        continue;
                    }
                    urls.extend(library.classpath_urls());
                }
                ModuleDependency::Module {
                    module: target,
                    scope,
                    exported,
                } => {
                    if scope != DependencyScope::Compile {
                        continue;
                    }
                    if !is_root && !exported {
                        continue;
                    }
                    if visited.insert(target.name()) {
                        queue.push((target, false));
                    }
                }
            }
        }
    }
    urls
}
