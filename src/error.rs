use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("could not find '{candidate}'")]
    BinaryNotFound { candidate: String },

    #[error("cannot execute '{}'", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to launch '{}': {source}", path.display())]
    Failed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a process is already running")]
    AlreadyRunning,
}

impl LaunchError {
    /// Sorts a spawn-time I/O error into the permission or generic case.
    pub fn from_spawn(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            LaunchError::PermissionDenied { path }
        } else {
            LaunchError::Failed { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_are_split_out() {
        let err = LaunchError::from_spawn(
            PathBuf::from("/opt/dump1090"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, LaunchError::PermissionDenied { .. }));

        let err = LaunchError::from_spawn(
            PathBuf::from("/opt/dump1090"),
            io::Error::new(io::ErrorKind::Other, "exec format error"),
        );
        assert!(matches!(err, LaunchError::Failed { .. }));
        assert!(err.to_string().ends_with("exec format error"));
    }
}
