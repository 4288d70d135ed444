use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::QueryResult;
use crate::error::QueryError;
use crate::session::Session;

/// Reflect an explicit list of files.
///
/// Every path must name an existing regular file; otherwise the call fails
/// before anything is parsed.
#[derive(Debug, Clone, Copy)]
pub struct FileSetQuery<'s> {
    session: &'s Session,
}

impl<'s> FileSetQuery<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Parse each file and concatenate their classes in input order.
    pub fn find<I, P>(&self, paths: I) -> Result<QueryResult, QueryError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths = paths
            .into_iter()
            .map(|path| validate(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(files = paths.len(), "file set query");

        let mut result = QueryResult::new(Arc::clone(self.session.registry()));
        for path in paths {
            result.collect(self.session, path);
        }
        Ok(result)
    }
}

fn validate(path: &Path) -> Result<PathBuf, QueryError> {
    let metadata = fs::metadata(path).map_err(|_| QueryError::NotFound {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(QueryError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        let session = Session::new();
        let error = FileSetQuery::new(&session).find([dir.path()]).unwrap_err();
        assert!(matches!(error, QueryError::NotAFile { .. }));
    }

    #[test]
    fn validation_precedes_parsing() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.php");
        fs::write(&good, "<?php class Good {}").unwrap();

        let session = Session::new();
        let error = FileSetQuery::new(&session)
            .find([good, dir.path().join("missing.php")])
            .unwrap_err();
        assert!(matches!(error, QueryError::NotFound { .. }));
        assert_eq!(session.stats().files_parsed, 0);
    }
}
