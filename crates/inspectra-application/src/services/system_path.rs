//! Allocation of exclusive per-build system directories
//!
//! The platform needs a working directory for caches and indices that no
//! concurrent invocation touches. Candidates are derived from the build
//! number with an incrementing code suffix; the first candidate whose lock
//! marker can be acquired wins. Losing a candidate to another process is
//! not an error, it just advances the search.

use inspectra_config::constants::{MAX_SYSTEM_PATH_ATTEMPTS, SYSTEM_LOCK_KIND};
use inspectra_config::paths;
use inspectra_core::{Error, LockStatus, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::lock_manager::SystemLock;

/// Finds or creates an exclusive system directory for a platform build.
#[derive(Debug, Clone)]
pub struct SystemPathAllocator {
    max_attempts: u32,
}

impl Default for SystemPathAllocator {
    fn default() -> Self {
        Self {
            max_attempts: MAX_SYSTEM_PATH_ATTEMPTS,
        }
    }
}

impl SystemPathAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the retry ceiling (tests, constrained environments).
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Allocate an exclusive system directory under `system_root`.
    ///
    /// Returns the directory together with the held lock; the lock stays
    /// live for the rest of the run and must be released by the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::SystemPathReentry`] when this process already owns a
    ///   system path (allocate called twice without release).
    /// - [`Error::NoFreeSystemPath`] when every candidate up to the retry
    ///   ceiling is held by other processes; no lock is left held.
    pub fn allocate(
        &self,
        system_root: &Path,
        build_number: &str,
        uses_ultimate: bool,
    ) -> Result<(PathBuf, SystemLock)> {
        let prefix = paths::system_path_prefix(build_number, uses_ultimate);

        for code in 1..=self.max_attempts {
            let candidate = paths::candidate_system_dir(system_root, &prefix, code);
            fs::create_dir_all(&candidate).map_err(|e| Error::Io {
                context: format!("cannot create system directory {}", candidate.display()),
                source: e,
            })?;

            let marker = paths::system_lock_marker(&candidate);
            match SystemLock::acquire(SYSTEM_LOCK_KIND, &marker)? {
                (LockStatus::Free, Some(lock)) => {
                    info!(path = %candidate.display(), attempts = code, "system directory allocated");
                    return Ok((candidate, lock));
                }
                (LockStatus::Skip, _) => return Err(Error::SystemPathReentry),
                _ => {
                    debug!(path = %candidate.display(), code, "system directory busy, trying next");
                }
            }
        }

        Err(Error::NoFreeSystemPath {
            root: system_root.to_path_buf(),
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs2::FileExt;
    use std::fs::OpenOptions;

    const BUILD: &str = "171.4";

    /// Hold the marker of a candidate the way a foreign process would.
    fn occupy_candidate(root: &Path, code: u32) -> std::fs::File {
        let prefix = paths::system_path_prefix(BUILD, false);
        let dir = paths::candidate_system_dir(root, &prefix, code);
        fs::create_dir_all(&dir).unwrap();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(paths::system_lock_marker(&dir))
            .unwrap();
        file.try_lock_exclusive().unwrap();
        file
    }

    #[test]
    fn first_candidate_is_taken_when_free() {
        let temp = tempfile::tempdir().unwrap();
        let (path, _lock) = SystemPathAllocator::new()
            .allocate(temp.path(), BUILD, false)
            .unwrap();
        assert_eq!(
            path,
            temp.path().join("171_4_code1").join("system"),
            "expected the code-1 candidate"
        );
        assert!(path.is_dir());
    }

    #[test]
    fn busy_candidates_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let _foreign = occupy_candidate(temp.path(), 1);

        let (path, _lock) = SystemPathAllocator::new()
            .allocate(temp.path(), BUILD, false)
            .unwrap();
        assert_eq!(path, temp.path().join("171_4_code2").join("system"));
    }

    #[test]
    fn ultimate_builds_get_their_own_prefix() {
        let temp = tempfile::tempdir().unwrap();
        let (path, _lock) = SystemPathAllocator::new()
            .allocate(temp.path(), BUILD, true)
            .unwrap();
        assert_eq!(path, temp.path().join("U_171_4_code1").join("system"));
    }

    #[test]
    fn double_allocation_in_one_process_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let allocator = SystemPathAllocator::new();
        let (_path, _lock) = allocator.allocate(temp.path(), BUILD, false).unwrap();

        let err = allocator.allocate(temp.path(), BUILD, false).unwrap_err();
        assert!(matches!(err, Error::SystemPathReentry), "{:?}", err);
    }

    #[test]
    fn exhausted_candidates_fail_without_leaking_a_lock() {
        let temp = tempfile::tempdir().unwrap();
        let attempts = 4;
        let _foreign: Vec<_> = (1..=attempts)
            .map(|code| occupy_candidate(temp.path(), code))
            .collect();

        let allocator = SystemPathAllocator::with_max_attempts(attempts);
        let err = allocator.allocate(temp.path(), BUILD, false).unwrap_err();
        match err {
            Error::NoFreeSystemPath { attempts: n, .. } => assert_eq!(n, attempts),
            other => panic!("expected NoFreeSystemPath, got {:?}", other),
        }

        // Nothing held by this process: once the foreign locks go away the
        // first candidate is free again.
        drop(_foreign);
        let (path, _lock) = allocator.allocate(temp.path(), BUILD, false).unwrap();
        assert_eq!(path, temp.path().join("171_4_code1").join("system"));
    }
}
