//! Errors surfaced by sessions and queries.
//!
//! ```text
//! FileError   - one file could not be read or parsed; isolated per file
//! QueryError  - the query itself was invalid; the whole call fails
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use static_reflection_core::ParseErrors;
use thiserror::Error;

/// Why a single file produced no classes.
///
/// Cached alongside successful parses, so it is cheap to clone.
#[derive(Debug, Clone, Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: Arc<io::Error>,
    },

    /// The file was read but did not parse cleanly.
    #[error("failed to parse {}: {errors}", path.display())]
    Parse { path: PathBuf, errors: ParseErrors },
}

impl FileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FileError::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// The file this error belongs to.
    pub fn path(&self) -> &Path {
        match self {
            FileError::Io { path, .. } | FileError::Parse { path, .. } => path,
        }
    }

    /// The parse errors, when the file was readable.
    pub fn parse_errors(&self) -> Option<&ParseErrors> {
        match self {
            FileError::Parse { errors, .. } => Some(errors),
            FileError::Io { .. } => None,
        }
    }
}

/// Invalid query input. Unlike [`FileError`], this aborts the whole query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A path given to the query does not exist.
    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// A file-set entry exists but is not a regular file.
    #[error("not a regular file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// A directory query root is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// An exclusion pattern failed to compile.
    #[error("invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_error_accessors() {
        let error = FileError::io("missing.php", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(error.path(), Path::new("missing.php"));
        assert!(error.parse_errors().is_none());
        assert!(error.to_string().starts_with("failed to read missing.php"));

        let error = FileError::Parse {
            path: PathBuf::from("bad.php"),
            errors: ParseErrors::new(),
        };
        assert!(error.parse_errors().is_some_and(ParseErrors::is_empty));
    }

    #[test]
    fn query_error_messages() {
        let error = QueryError::NotFound {
            path: PathBuf::from("nowhere"),
        };
        assert_eq!(error.to_string(), "no such file or directory: nowhere");
    }
}
