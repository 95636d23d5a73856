use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::LaunchError;

/// Resolves a bare name against `search_path`, falling back to the
/// candidate itself when it names an existing regular file.
pub fn resolve_in(candidate: &str, search_path: Option<&OsStr>) -> Result<PathBuf, LaunchError> {
    if !candidate.is_empty() {
        if let Some(found) = search_path.and_then(|path| find_on_path(path, candidate)) {
            debug!("Resolved {candidate} on search path: {}", found.display());
            return Ok(found);
        }

        let path = Path::new(candidate);
        if path.is_file() {
            debug!("Resolved {candidate} as a file path");
            return Ok(path.to_path_buf());
        }
    }

    Err(LaunchError::BinaryNotFound {
        candidate: candidate.to_owned(),
    })
}

/// First candidate found on `PATH`, or an empty string when none are.
pub fn autodetect(candidates: &[&str]) -> String {
    autodetect_in(candidates, env::var_os("PATH").as_deref())
}

pub fn autodetect_in(candidates: &[&str], search_path: Option<&OsStr>) -> String {
    let Some(search_path) = search_path else {
        return String::new();
    };

    candidates
        .iter()
        .find(|name| find_on_path(search_path, name).is_some())
        .map(|name| (*name).to_owned())
        .unwrap_or_default()
}

fn find_on_path(search_path: &OsStr, name: &str) -> Option<PathBuf> {
    // A name with a separator is a path, never a search-path lookup
    if Path::new(name).components().count() != 1 {
        return None;
    }

    let cwd = env::current_dir().unwrap_or_default();
    which::which_in(name, Some(search_path), cwd).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, executable: bool) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = if executable { 0o755 } else { 0o644 };
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        }
        #[cfg(not(unix))]
        let _ = executable;

        path
    }

    fn search_path(dirs: &[&Path]) -> OsString {
        env::join_paths(dirs).unwrap()
    }

    #[test]
    fn finds_name_on_search_path() {
        let bin = TempDir::new().unwrap();
        let expected = touch(bin.path(), "dump1090-fa", true);

        let path = search_path(&[bin.path()]);
        let found = resolve_in("dump1090-fa", Some(&path)).unwrap();

        assert!(!found.as_os_str().is_empty());
        assert_eq!(fs::canonicalize(found).unwrap(), fs::canonicalize(expected).unwrap());
    }

    #[test]
    fn earlier_search_path_entries_win() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = touch(first.path(), "dump1090", true);
        touch(second.path(), "dump1090", true);

        let path = search_path(&[first.path(), second.path()]);
        let found = resolve_in("dump1090", Some(&path)).unwrap();
        assert_eq!(fs::canonicalize(found).unwrap(), fs::canonicalize(expected).unwrap());
    }

    #[test]
    fn missing_name_and_path_is_not_found() {
        let bin = TempDir::new().unwrap();
        let path = search_path(&[bin.path()]);

        let err = resolve_in("no-such-dump1090", Some(&path)).unwrap_err();
        assert!(matches!(err, LaunchError::BinaryNotFound { ref candidate } if candidate == "no-such-dump1090"));

        let missing = bin.path().join("nope").join("dump1090");
        let err = resolve_in(missing.to_str().unwrap(), Some(&path)).unwrap_err();
        assert!(matches!(err, LaunchError::BinaryNotFound { .. }));
    }

    #[test]
    fn existing_file_path_is_returned_unchanged() {
        let elsewhere = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        let file = touch(elsewhere.path(), "my-dump1090", false);

        let path = search_path(&[empty.path()]);
        let candidate = file.to_str().unwrap();
        assert_eq!(resolve_in(candidate, Some(&path)).unwrap(), PathBuf::from(candidate));
    }

    #[test]
    fn directories_are_not_binaries() {
        let dir = TempDir::new().unwrap();
        let err = resolve_in(dir.path().to_str().unwrap(), None).unwrap_err();
        assert!(matches!(err, LaunchError::BinaryNotFound { .. }));
    }

    #[test]
    fn empty_candidate_is_not_found() {
        assert!(matches!(
            resolve_in("", None),
            Err(LaunchError::BinaryNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_search_path_hits_are_skipped() {
        let bin = TempDir::new().unwrap();
        touch(bin.path(), "dump1090", false);

        let path = search_path(&[bin.path()]);
        assert!(find_on_path(&path, "dump1090").is_none());
    }

    #[test]
    fn autodetect_prefers_candidate_order() {
        let bin = TempDir::new().unwrap();
        touch(bin.path(), "dump1090-mutability", true);
        touch(bin.path(), "dump1090-fa", true);

        let path = search_path(&[bin.path()]);
        let candidates = ["dump1090", "dump1090-fa", "dump1090-mutability"];
        assert_eq!(autodetect_in(&candidates, Some(&path)), "dump1090-fa");
    }

    #[test]
    fn autodetect_without_hits_is_empty() {
        let bin = TempDir::new().unwrap();
        let path = search_path(&[bin.path()]);
        assert_eq!(autodetect_in(&["dump1090"], Some(&path)), "");
        assert_eq!(autodetect_in(&["dump1090"], None), "");
    }
}
