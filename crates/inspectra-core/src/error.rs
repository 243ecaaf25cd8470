//! Error types for the inspectra core domain
//!
//! The whole workspace funnels failures into a single distinguished error
//! kind. Callers (build-tool integrations, CLIs) receive one `Error` with a
//! descriptive message and, where available, the original cause as `source`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error accepted from external analyzer implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// Error Kinds - Classification for operational triage
// ============================================================================

/// Error classification.
///
/// `Contention` is recoverable inside the allocation retry loop and only
/// surfaces to callers once the retry budget is exhausted. Everything else
/// is fatal for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// All candidate working directories were busy
    Contention,
    /// Same-process misuse: double allocation, double shutdown, parallel runners
    Reentrancy,
    /// Unsupported host variant, missing or incompatible companion plugin
    Compatibility,
    /// Lock file or descriptor file operation failed
    Io,
    /// The host refused to open the project
    HostOpen,
    /// The external analysis callback failed
    Analysis,
}

/// The distinguished error kind of the inspection runner.
#[derive(Debug, Error)]
pub enum Error {
    /// A lock file could not be opened or locked
    #[error("failed to acquire {kind} lock '{name}': {source}")]
    Lock {
        /// Lock kind (e.g. "system")
        kind: String,
        /// Lock file name
        name: String,
        #[source]
        source: io::Error,
    },

    /// Every candidate working directory was held by another process
    #[error("no free system directory under {} after {attempts} attempts", root.display())]
    NoFreeSystemPath { root: PathBuf, attempts: u32 },

    /// This process already owns a system path
    #[error("system path already allocated by this process")]
    SystemPathReentry,

    /// Another runner instance is live in this process
    #[error("another inspection runner is already live in this process")]
    RunnerBusy,

    /// No application instance is running (shutdown before bootstrap, or twice)
    #[error("no platform instance is running")]
    NotRunning,

    /// The platform could not be brought up
    #[error("cannot bootstrap the platform: {reason}")]
    Bootstrap { reason: String },

    /// The host failed to open the project descriptor
    #[error("cannot open project {}", path.display())]
    ProjectOpen { path: PathBuf },

    /// The external analysis callback raised a foreign error
    #[error("exception caught in inspection plugin: {source}")]
    Analysis {
        #[source]
        source: BoxError,
    },

    /// Filesystem operation outside of locking failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Shorthand for a bootstrap failure with a human-readable reason.
    pub fn bootstrap(reason: impl Into<String>) -> Self {
        Error::Bootstrap {
            reason: reason.into(),
        }
    }

    /// Classify this error for triage.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lock { .. } | Error::Io { .. } => ErrorKind::Io,
            Error::NoFreeSystemPath { .. } => ErrorKind::Contention,
            Error::SystemPathReentry | Error::RunnerBusy | Error::NotRunning => {
                ErrorKind::Reentrancy
            }
            Error::Bootstrap { .. } => ErrorKind::Compatibility,
            Error::ProjectOpen { .. } => ErrorKind::HostOpen,
            Error::Analysis { .. } => ErrorKind::Analysis,
        }
    }
}
