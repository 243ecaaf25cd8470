//! Analysis strategy interface
//!
//! The inspection engine is an external collaborator: the runner hands it
//! the opened project and the caller's child parameters, exactly once per
//! successful run, and takes back a boolean verdict. Errors may be of any
//! type; the runner wraps foreign ones into the workspace error kind.

use async_trait::async_trait;
use inspectra_core::BoxError;
use std::sync::Arc;

use crate::project::ProjectRef;

/// Thread-safe reference to an analyzer
pub type AnalyzerRef<T> = Arc<dyn Analyzer<T> + Send + Sync>;

/// The external analysis callback.
#[async_trait]
pub trait Analyzer<T> {
    /// Run the analysis. The boolean result is the run's success signal,
    /// distinct from error-raising failure.
    async fn analyze(
        &self,
        project: ProjectRef,
        parameters: &T,
    ) -> std::result::Result<bool, BoxError>;
}

/// Adapter turning a plain function value into an [`Analyzer`].
pub struct FnAnalyzer<F>(F);

impl<F> FnAnalyzer<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<T, F> Analyzer<T> for FnAnalyzer<F>
where
    T: Sync,
    F: Fn(ProjectRef, &T) -> std::result::Result<bool, BoxError> + Send + Sync,
{
    async fn analyze(
        &self,
        project: ProjectRef,
        parameters: &T,
    ) -> std::result::Result<bool, BoxError> {
        (self.0)(project, parameters)
    }
}
