//! Path derivation for the inspection runner
//!
//! All locations the runner touches on disk are derived here, from the run
//! parameters and the constants in [`crate::constants`].

use std::io;
use std::path::{Path, PathBuf};

use crate::constants::{
    BUILD_DESCRIPTOR_FILE_NAME, PROJECT_FILE_EXTENSION, SYSTEM_LOCK_FILE_NAME,
};

/// Directory-name prefix for system directories of one platform build.
///
/// Dots in the build number are replaced so the prefix is a single path
/// component; the unsupported ultimate variant is kept apart with `U_`.
pub fn system_path_prefix(build_number: &str, uses_ultimate: bool) -> String {
    let sanitized = build_number.replace('.', "_");
    if uses_ultimate {
        format!("U_{}", sanitized)
    } else {
        sanitized
    }
}

/// Candidate system directory for a given prefix and attempt code.
///
/// Layout: `<root>/<prefix>_code<code>/system`.
pub fn candidate_system_dir(root: &Path, prefix: &str, code: u32) -> PathBuf {
    root.join(format!("{}_code{}", prefix, code)).join("system")
}

/// Lock marker file inside a candidate system directory.
pub fn system_lock_marker(system_dir: &Path) -> PathBuf {
    system_dir.join(SYSTEM_LOCK_FILE_NAME)
}

/// Build descriptor file under a platform home directory.
pub fn build_descriptor_path(home_directory: &Path) -> PathBuf {
    home_directory.join(BUILD_DESCRIPTOR_FILE_NAME)
}

/// Project descriptor file for a project directory and name.
pub fn project_descriptor_path(project_dir: &Path, project_name: &str) -> PathBuf {
    project_dir.join(format!("{}.{}", project_name, PROJECT_FILE_EXTENSION))
}

/// Create the parent directory of `path` if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_replaces_dots() {
        assert_eq!(system_path_prefix("171.4249.32", false), "171_4249_32");
    }

    #[test]
    fn ultimate_prefix_is_kept_apart() {
        assert_eq!(system_path_prefix("171.4", true), "U_171_4");
    }

    #[test]
    fn candidate_dirs_increment_by_code() {
        let root = Path::new("/tmp/systems");
        assert_eq!(
            candidate_system_dir(root, "171_4", 1),
            PathBuf::from("/tmp/systems/171_4_code1/system")
        );
        assert_eq!(
            candidate_system_dir(root, "171_4", 2),
            PathBuf::from("/tmp/systems/171_4_code2/system")
        );
    }

    #[test]
    fn project_descriptor_uses_the_fixed_extension() {
        assert_eq!(
            project_descriptor_path(Path::new("/work/proj"), "sample"),
            PathBuf::from("/work/proj/sample.ipr")
        );
    }

    #[test]
    fn ensure_parent_dir_creates_missing_directories() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b").join("file.lock");
        ensure_parent_dir(&nested).unwrap();
        assert!(nested.parent().unwrap().is_dir());
    }

    #[test]
    fn ensure_parent_dir_accepts_existing_directories() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("file.lock");
        ensure_parent_dir(&file).unwrap();
        ensure_parent_dir(&file).unwrap();
    }
}
