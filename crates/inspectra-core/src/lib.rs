//! Inspectra Core - Domain entities for headless platform inspection runs
//!
//! This crate contains the domain model of the inspection runner.
//! It has minimal dependencies and no infrastructure concerns.
//!
//! # Architecture
//!
//! - `parameters` - Run parameters and plugin references
//! - `build` - Platform build configuration parsing
//! - `plugin` - Host-side plugin descriptors and host version
//! - `classification` - Module classification from dependency classpaths
//! - `error` - The distinguished error kind for the whole workspace
//!
//! # Related Crates
//!
//! - Constants and path derivation: `inspectra-config`
//! - Port traits (HostApplication, Analyzer, etc.): `inspectra-ports`
//! - Lifecycle services (lock manager, allocator, runner): `inspectra-application`

pub mod build;
pub mod classification;
pub mod error;
pub mod parameters;
pub mod plugin;

pub use build::{BuildConfiguration, DEFAULT_BUILD_NUMBER, ULTIMATE_VARIANT_CODE};
pub use classification::{
    ModuleClassification, COMMON_RUNTIME_MARKERS, JS_RUNTIME_MARKERS, JVM_RUNTIME_MARKERS,
};
pub use error::{BoxError, Error, ErrorKind, Result};
pub use parameters::{LockStatus, PluginRef, RunParameters};
pub use plugin::{HostVersion, PluginDescriptor};
