//! Exclusive file locks guarding platform working directories
//!
//! Locks are advisory, non-blocking and exclusive. Cross-process contention
//! is arbitrated by the OS; same-process re-acquisition is detected through
//! a process-global registry of held lock paths and reported as
//! [`LockStatus::Skip`] so misuse fails fast instead of deadlocking.

use fs2::FileExt;
use inspectra_config::paths;
use inspectra_core::{Error, LockStatus, Result};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::{debug, warn};

/// Lock file paths currently held by this process.
fn lock_registry() -> MutexGuard<'static, HashSet<PathBuf>> {
    static HELD: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();
    match HELD.get_or_init(|| Mutex::new(HashSet::new())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// An exclusive advisory lock on a working-directory marker file.
///
/// Owns the OS lock and the open file handle behind it. Released exactly
/// once through [`SystemLock::release`]; dropping an unreleased lock
/// releases it as a backstop.
#[derive(Debug)]
pub struct SystemLock {
    kind: String,
    path: PathBuf,
    file: Option<File>,
}

impl SystemLock {
    /// Attempt to acquire an exclusive lock on `lock_file`.
    ///
    /// Creates parent directories and the lock file if absent. Returns the
    /// lock status and, for [`LockStatus::Free`], the live lock handle.
    ///
    /// # Errors
    ///
    /// Any I/O failure during open or lock is fatal and reported with the
    /// lock's name and kind.
    pub fn acquire(kind: &str, lock_file: &Path) -> Result<(LockStatus, Option<SystemLock>)> {
        paths::ensure_parent_dir(lock_file).map_err(|e| lock_error(kind, lock_file, e))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_file)
            .map_err(|e| lock_error(kind, lock_file, e))?;

        let canonical = lock_file
            .canonicalize()
            .map_err(|e| lock_error(kind, lock_file, e))?;

        if lock_registry().contains(&canonical) {
            debug!(kind, path = %canonical.display(), "lock already held by this process");
            return Ok((LockStatus::Skip, None));
        }

        match file.try_lock_exclusive() {
            Ok(()) => {
                lock_registry().insert(canonical.clone());
                debug!(kind, path = %canonical.display(), "lock acquired");
                Ok((
                    LockStatus::Free,
                    Some(SystemLock {
                        kind: kind.to_string(),
                        path: canonical,
                        file: Some(file),
                    }),
                ))
            }
            Err(e) if is_contended(&e) => {
                debug!(kind, path = %canonical.display(), "lock held by another process");
                Ok((LockStatus::Used, None))
            }
            Err(e) => Err(lock_error(kind, lock_file, e)),
        }
    }

    /// Release the lock held in `slot`, if any.
    ///
    /// No-op on an empty slot; the slot is cleared, so a second call is a
    /// no-op as well. Release failures are logged, never escalated.
    pub fn release(slot: &mut Option<SystemLock>) {
        match slot.take() {
            Some(mut lock) => lock.release_inner(),
            None => debug!("no system lock to release"),
        }
    }

    /// Path of the locked marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn release_inner(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        if let Err(e) = file.unlock() {
            warn!(kind = %self.kind, path = %self.path.display(), error = %e, "failed to release lock");
        }
        lock_registry().remove(&self.path);
        debug!(kind = %self.kind, path = %self.path.display(), "lock released");
        // Handle closes when `file` drops here
    }
}

impl Drop for SystemLock {
    fn drop(&mut self) {
        if self.file.is_some() {
            debug!(kind = %self.kind, path = %self.path.display(), "releasing lock on drop");
            self.release_inner();
        }
    }
}

fn is_contended(error: &io::Error) -> bool {
    error.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn lock_error(kind: &str, lock_file: &Path, source: io::Error) -> Error {
    Error::Lock {
        kind: kind.to_string(),
        name: lock_file.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(temp: &tempfile::TempDir, name: &str) -> PathBuf {
        temp.path().join(name)
    }

    /// Lock the file outside of the registry, as a foreign process would.
    fn foreign_lock(path: &Path) -> File {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .unwrap();
        file.try_lock_exclusive().unwrap();
        file
    }

    #[test]
    fn fresh_file_is_acquired_free() {
        let temp = tempfile::tempdir().unwrap();
        let (status, lock) = SystemLock::acquire("system", &marker(&temp, "a.lock")).unwrap();
        assert_eq!(status, LockStatus::Free);
        assert!(lock.is_some());
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("x").join("y").join("a.lock");
        let (status, lock) = SystemLock::acquire("system", &nested).unwrap();
        assert_eq!(status, LockStatus::Free);
        assert!(lock.is_some());
        assert!(nested.exists());
    }

    #[test]
    fn foreign_holder_yields_used() {
        let temp = tempfile::tempdir().unwrap();
        let path = marker(&temp, "contended.lock");
        let _held = foreign_lock(&path);

        let (status, lock) = SystemLock::acquire("system", &path).unwrap();
        assert_eq!(status, LockStatus::Used);
        assert!(lock.is_none());
    }

    #[test]
    fn same_process_reacquisition_yields_skip() {
        let temp = tempfile::tempdir().unwrap();
        let path = marker(&temp, "mine.lock");
        let (status, first) = SystemLock::acquire("system", &path).unwrap();
        assert_eq!(status, LockStatus::Free);

        let (status, second) = SystemLock::acquire("system", &path).unwrap();
        assert_eq!(status, LockStatus::Skip);
        assert!(second.is_none());

        drop(first);
    }

    #[test]
    fn release_is_idempotent_and_frees_the_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = marker(&temp, "released.lock");
        let (_, lock) = SystemLock::acquire("system", &path).unwrap();

        let mut slot = lock;
        SystemLock::release(&mut slot);
        assert!(slot.is_none());
        SystemLock::release(&mut slot); // second call is a no-op

        // Re-acquisition sees a fresh lock, not Skip
        let (status, again) = SystemLock::acquire("system", &path).unwrap();
        assert_eq!(status, LockStatus::Free);
        assert!(again.is_some());
    }

    #[test]
    fn dropping_an_unreleased_lock_frees_the_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = marker(&temp, "dropped.lock");
        {
            let (_, _lock) = SystemLock::acquire("system", &path).unwrap();
        }
        let (status, _) = SystemLock::acquire("system", &path).unwrap();
        assert_eq!(status, LockStatus::Free);
    }

    #[test]
    fn io_failures_are_fatal_with_kind_and_name() {
        let temp = tempfile::tempdir().unwrap();
        // A directory cannot be opened for writing
        let err = SystemLock::acquire("system", temp.path()).unwrap_err();
        match err {
            Error::Lock { kind, name, .. } => {
                assert_eq!(kind, "system");
                assert!(name.contains(temp.path().to_str().unwrap()));
            }
            other => panic!("expected lock error, got {:?}", other),
        }
    }
}
