//! Port traits of the inspection runner
//!
//! These traits are the boundary between the lifecycle controller and its
//! external collaborators: the host platform, the project model it exposes,
//! the plugin compatibility rules, and the analysis engine. Implementations
//! live with the embedding (the real platform integration, or mocks in
//! tests); the application layer depends only on the traits.

pub mod analyzer;
pub mod compatibility;
pub mod host;
pub mod project;

pub use analyzer::{Analyzer, AnalyzerRef, FnAnalyzer};
pub use compatibility::{BuildRangeChecker, CompatibilityChecker, CompatibilityCheckerRef};
pub use host::{ApplicationRef, HostApplication, HostLauncher, LaunchSpec, LauncherRef};
pub use project::{
    DependencyScope, LibraryHandle, LibraryRef, ModuleDependency, ModuleHandle, ModuleRef,
    ProjectHandle, ProjectRef,
};
