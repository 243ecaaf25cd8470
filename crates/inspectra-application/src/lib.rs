//! # Inspectra Application Layer
//!
//! This crate contains the process lifecycle and mutual-exclusion controller
//! of the inspection runner: the services that bring a heavyweight host
//! platform up in headless mode, open a project in it, hand it to an
//! external analysis callback, and tear everything down again.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Embedding                          │  <- build-tool integration, CLI
//! ├─────────────────────────────────────┤
//! │  Application Layer                  │  <- THIS CRATE
//! │  (lifecycle services, runner)       │
//! ├─────────────────────────────────────┤
//! │  Ports                              │  <- inspectra-ports
//! │  (HostApplication, Analyzer, ...)   │
//! ├─────────────────────────────────────┤
//! │  Domain Layer                       │  <- inspectra-core
//! │  (parameters, classification, err)  │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Services
//!
//! - [`SystemLock`] - exclusive advisory file locks guarding working dirs
//! - [`SystemPathAllocator`] - collision-free per-build system directories
//! - [`ApplicationBootstrapper`] - platform startup, plugin and JDK setup
//! - [`ProjectOpener`] - project open and module classification
//! - [`InspectionRunner`] - run orchestration with guaranteed cleanup
//!
//! ## Concurrency contract
//!
//! One runner instance per process (enforced at construction), one host
//! application instance per process (a documented platform constraint, kept
//! in a process-wide slot). The lock file under each system directory is the
//! only resource shared across OS processes.

pub mod services;

// Output ports are in the inspectra-ports crate.
// Re-export for convenience
pub use inspectra_ports as ports;

pub use services::{
    running_application, ApplicationBootstrapper, InspectionRunner, ProjectOpener, RunStage,
    SystemLock, SystemPathAllocator,
};
