//! Run orchestration with guaranteed cleanup
//!
//! The runner sequences bootstrap, project open and the external analysis
//! callback, then releases the system lock on every path. Application
//! shutdown is a separate, owner-invoked step so several runs can share one
//! platform instance.

use inspectra_core::{BoxError, Error, Result, RunParameters};
use inspectra_ports::{AnalyzerRef, ApplicationRef, CompatibilityCheckerRef, LauncherRef};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::bootstrap::{self, ApplicationBootstrapper};
use super::lock_manager::SystemLock;
use super::project_opener::ProjectOpener;

/// Stage a runner is in; diagnostic, mirrored in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Bootstrapped,
    ProjectOpen,
    Analyzing,
    Done,
    Failed,
    Shutdown,
}

/// Set while a runner instance is live in this process.
static RUNNER_LIVE: AtomicBool = AtomicBool::new(false);

/// Constructor-time exclusivity token; concurrent runner instances in one
/// process are refused instead of detected later.
struct RunnerToken(());

impl RunnerToken {
    fn acquire() -> Result<Self> {
        if RUNNER_LIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Ok(Self(()))
        } else {
            Err(Error::RunnerBusy)
        }
    }
}

impl Drop for RunnerToken {
    fn drop(&mut self) {
        RUNNER_LIVE.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates one inspection run at a time.
pub struct InspectionRunner<T> {
    bootstrapper: ApplicationBootstrapper,
    opener: ProjectOpener,
    analyzer: AnalyzerRef<T>,
    system_lock: Option<SystemLock>,
    stage: RunStage,
    _token: RunnerToken,
}

impl<T> std::fmt::Debug for InspectionRunner<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectionRunner")
            .field("stage", &self.stage)
            .field("has_lock", &self.system_lock.is_some())
            .finish()
    }
}

impl<T: Sync> InspectionRunner<T> {
    /// Create the runner.
    ///
    /// # Errors
    ///
    /// [`Error::RunnerBusy`] when another runner instance is live in this
    /// process.
    pub fn new(
        launcher: LauncherRef,
        compatibility: CompatibilityCheckerRef,
        analyzer: AnalyzerRef<T>,
    ) -> Result<Self> {
        let token = RunnerToken::acquire()?;
        Ok(Self {
            bootstrapper: ApplicationBootstrapper::new(launcher, compatibility),
            opener: ProjectOpener::new(),
            analyzer,
            system_lock: None,
            stage: RunStage::Idle,
            _token: token,
        })
    }

    /// Replace the default bootstrapper (tests, custom allocators).
    pub fn with_bootstrapper(mut self, bootstrapper: ApplicationBootstrapper) -> Self {
        self.bootstrapper = bootstrapper;
        self
    }

    /// Current stage (diagnostic).
    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Execute one run: bootstrap, open, analyze.
    ///
    /// The analysis verdict becomes the return value. The system lock is
    /// released on every path, including after a partially completed
    /// bootstrap.
    #[instrument(skip(self, parameters), fields(project = %parameters.project_name))]
    pub async fn run(&mut self, parameters: &RunParameters<T>) -> Result<bool> {
        info!(
            version = %parameters.idea_version,
            project = %parameters.project_name,
            "starting inspection run"
        );

        let outcome = self.run_stages(parameters).await;
        SystemLock::release(&mut self.system_lock);

        match &outcome {
            Ok(verdict) => {
                self.stage = RunStage::Done;
                info!(verdict, "inspection run finished");
            }
            Err(error) => {
                self.stage = RunStage::Failed;
                warn!(%error, "inspection run failed");
            }
        }
        outcome
    }

    async fn run_stages(&mut self, parameters: &RunParameters<T>) -> Result<bool> {
        let app = self
            .bootstrapper
            .bootstrap(parameters, &mut self.system_lock)
            .await?;
        self.stage = RunStage::Bootstrapped;

        let project = self
            .opener
            .open(
                &app,
                &parameters.project_dir,
                &parameters.project_name,
                &parameters.module_name,
            )
            .await?;
        self.stage = RunStage::ProjectOpen;

        self.stage = RunStage::Analyzing;
        match self.analyzer.analyze(project, &parameters.child).await {
            Ok(verdict) => Ok(verdict),
            Err(source) => Err(wrap_analysis_error(source)),
        }
    }

    /// Shut the platform instance down: forced, no save, no confirmation.
    ///
    /// Blocks until the host acknowledges the request. Abrupt process
    /// termination is disabled for the duration of the request and restored
    /// afterwards, whatever the outcome. Exit failures are logged, not
    /// escalated.
    ///
    /// # Errors
    ///
    /// [`Error::NotRunning`] when no application instance is live (shutdown
    /// before bootstrap, or called twice).
    pub async fn shutdown(&mut self) -> Result<()> {
        let Some(app) = bootstrap::take_running_application().await else {
            return Err(Error::NotRunning);
        };

        info!("requesting platform exit");
        let result = {
            let _guard = AbruptTerminationGuard::new(&app);
            app.exit().await
        };
        self.stage = RunStage::Shutdown;

        if let Err(error) = result {
            warn!(%error, "platform exit reported a failure");
        }
        Ok(())
    }
}

/// Preserve the run's error when it is already the distinguished kind, wrap
/// foreign analyzer errors otherwise.
fn wrap_analysis_error(source: BoxError) -> Error {
    match source.downcast::<Error>() {
        Ok(error) => *error,
        Err(foreign) => Error::Analysis { source: foreign },
    }
}

/// Disables the host's abrupt process termination for a scope.
struct AbruptTerminationGuard {
    app: ApplicationRef,
}

impl AbruptTerminationGuard {
    fn new(app: &ApplicationRef) -> Self {
        app.set_abrupt_termination(false);
        Self {
            app: Arc::clone(app),
        }
    }
}

impl Drop for AbruptTerminationGuard {
    fn drop(&mut self) {
        self.app.set_abrupt_termination(true);
    }
}
