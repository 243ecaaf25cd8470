//! Project model exposed by the host
//!
//! A read-only view over an opened project: its modules, their dependency
//! edges, and the classpaths of the libraries they reach. The runner walks
//! this graph to classify modules; it never mutates it.

use std::sync::Arc;

/// Thread-safe reference to an opened project
pub type ProjectRef = Arc<dyn ProjectHandle + Send + Sync>;

/// Thread-safe reference to a module
pub type ModuleRef = Arc<dyn ModuleHandle + Send + Sync>;

/// Thread-safe reference to a library
pub type LibraryRef = Arc<dyn LibraryHandle + Send + Sync>;

/// Scope of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyScope {
    Compile,
    Test,
    Runtime,
    Provided,
}

/// One outgoing dependency edge of a module.
#[derive(Clone)]
pub enum ModuleDependency {
    /// Edge to a library on some classpath
    Library {
        library: LibraryRef,
        scope: DependencyScope,
        exported: bool,
    },
    /// Edge to another module of the same project
    Module {
        module: ModuleRef,
        scope: DependencyScope,
        exported: bool,
    },
}

/// An opened project.
pub trait ProjectHandle: std::fmt::Debug {
    /// Project name as reported by the host.
    fn name(&self) -> String;

    /// All modules of the project.
    fn modules(&self) -> Vec<ModuleRef>;
}

/// A module of an opened project.
pub trait ModuleHandle {
    /// Module name.
    fn name(&self) -> String;

    /// Direct outgoing dependency edges.
    fn dependencies(&self) -> Vec<ModuleDependency>;
}

/// A library reachable from a module's dependency edges.
pub trait LibraryHandle {
    /// Library name (diagnostic only).
    fn name(&self) -> String;

    /// Classpath URLs of the library roots.
    fn classpath_urls(&self) -> Vec<String>;
}
