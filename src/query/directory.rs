use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::QueryResult;
use crate::error::{FileError, QueryError};
use crate::session::Session;

/// Hidden files and directories.
const DEFAULT_EXCLUDE: &str = r"^\.";

/// Reflect every file below a directory.
///
/// Exclusion patterns are regular expressions matched against each path
/// component below the root; a matching directory is not descended into.
/// Entries are visited in file-name order.
#[derive(Debug, Clone)]
pub struct DirectoryQuery<'s> {
    session: &'s Session,
    excludes: Vec<String>,
    extensions: Vec<String>,
    recursive: bool,
}

impl<'s> DirectoryQuery<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            excludes: vec![DEFAULT_EXCLUDE.to_string()],
            extensions: Vec::new(),
            recursive: true,
        }
    }

    /// Add an exclusion pattern. Patterns are compiled by [`find`](Self::find).
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Descend into subdirectories (default) or only read the root.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Only parse files with one of these extensions (case-insensitive,
    /// without the dot). No filter means every regular file.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn find(&self, directory: impl AsRef<Path>) -> Result<QueryResult, QueryError> {
        let root = directory.as_ref();
        if !root.exists() {
            return Err(QueryError::NotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(QueryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        let excludes = self
            .excludes
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| QueryError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(root = %root.display(), recursive = self.recursive, "directory query");

        let walker = WalkDir::new(root)
            .follow_links(true)
            .max_depth(if self.recursive { usize::MAX } else { 1 })
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.file_name(), &excludes));

        let mut result = QueryResult::new(Arc::clone(self.session.registry()));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let path = error.path().unwrap_or(root).to_path_buf();
                    trace!(path = %path.display(), %error, "unreadable entry");
                    result.push_failure(path.clone(), FileError::io(path, io::Error::from(error)));
                    continue;
                }
            };
            if entry.file_type().is_file() && self.wants(entry.path()) {
                result.collect(self.session, entry.into_path());
            }
        }
        Ok(result)
    }

    fn wants(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
    }
}

fn is_excluded(name: &OsStr, excludes: &[Regex]) -> bool {
    let name = name.to_string_lossy();
    excludes.iter().any(|pattern| pattern.is_match(&name))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/Model")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("vendor")).unwrap();
        fs::write(root.join("src/Model/User.php"), "<?php namespace Model; class User {}").unwrap();
        fs::write(root.join("src/App.php"), "<?php class App {}").unwrap();
        fs::write(root.join("src/notes.txt"), "plain text").unwrap();
        fs::write(root.join(".git/Hidden.php"), "<?php class Hidden {}").unwrap();
        fs::write(root.join("vendor/Lib.php"), "<?php class Lib {}").unwrap();
        dir
    }

    fn names(result: &QueryResult) -> Vec<&str> {
        result.classes().iter().map(|class| class.name()).collect()
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let dir = tree();
        let session = Session::new();
        let result = DirectoryQuery::new(&session).find(dir.path()).unwrap();
        assert_eq!(names(&result), ["App", "Model\\User", "Lib"]);
        assert!(result.is_complete());
    }

    #[test]
    fn extra_excludes_and_extensions() {
        let dir = tree();
        fs::write(dir.path().join("src/broken.txt"), "<?php class X {").unwrap();
        let session = Session::new();
        let result = DirectoryQuery::new(&session)
            .exclude("^vendor$")
            .extensions(["PHP"])
            .find(dir.path())
            .unwrap();
        assert_eq!(names(&result), ["App", "Model\\User"]);
        assert!(result.is_complete());
    }

    #[test]
    fn non_recursive_reads_root_only() {
        let dir = tree();
        fs::write(dir.path().join("Top.php"), "<?php class Top {}").unwrap();
        let session = Session::new();
        let result = DirectoryQuery::new(&session).recursive(false).find(dir.path()).unwrap();
        assert_eq!(names(&result), ["Top"]);
    }

    #[test]
    fn invalid_pattern_fails_query() {
        let dir = tree();
        let session = Session::new();
        let error = DirectoryQuery::new(&session).exclude("(").find(dir.path()).unwrap_err();
        assert!(matches!(error, QueryError::InvalidPattern { .. }));
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tree();
        let session = Session::new();
        let query = DirectoryQuery::new(&session);
        assert!(matches!(
            query.find(dir.path().join("src/App.php")),
            Err(QueryError::NotADirectory { .. })
        ));
        assert!(matches!(
            query.find(dir.path().join("nope")),
            Err(QueryError::NotFound { .. })
        ));
    }
}
