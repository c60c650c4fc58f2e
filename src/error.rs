use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures inside the read/parse layer.
///
/// These never leave the public [`SystemReader`](crate::reader::SystemReader) API:
/// every query absorbs them into an empty or zero value.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("failed to read {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("process source {} no longer exists", path.display())]
    StaleReference { path: PathBuf },

    #[error("malformed record in {}: {reason}", path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("key {key:?} not found in {}", path.display())]
    KeyNotFound { path: PathBuf, key: String },
}

impl ReadError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReadError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ReadError::MalformedRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn key_not_found(path: impl Into<PathBuf>, key: &str) -> Self {
        ReadError::KeyNotFound {
            path: path.into(),
            key: key.to_string(),
        }
    }

    /// Turns a `NotFound` (process gone before open) or `ESRCH` (gone while
    /// reading) on a per-process source into a stale reference.
    pub(crate) fn into_stale(self) -> Self {
        match self {
            ReadError::SourceUnavailable { path, source }
                if source.kind() == io::ErrorKind::NotFound
                    || source.raw_os_error() == Some(libc::ESRCH) =>
            {
                ReadError::StaleReference { path }
            }
            other => other,
        }
    }

    /// Expected outcomes (vanished process, absent key) as opposed to a real failure.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ReadError::StaleReference { .. } | ReadError::KeyNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_on_process_source_becomes_stale() {
        let err = ReadError::unavailable(
            "/proc/4242/stat",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        )
        .into_stale();
        assert!(matches!(err, ReadError::StaleReference { .. }));
        assert!(err.is_expected());
    }

    #[test]
    fn no_such_process_while_reading_becomes_stale() {
        let err = ReadError::unavailable(
            "/proc/4242/stat",
            io::Error::from_raw_os_error(libc::ESRCH),
        )
        .into_stale();
        assert!(matches!(err, ReadError::StaleReference { .. }));
    }

    #[test]
    fn permission_denied_stays_unavailable() {
        let err = ReadError::unavailable(
            "/proc/1/status",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        )
        .into_stale();
        assert!(matches!(err, ReadError::SourceUnavailable { .. }));
        assert!(!err.is_expected());
    }
}
