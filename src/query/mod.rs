//! Queries over sets of files.
//!
//! A query validates its input up front, then parses every file through a
//! [`Session`](crate::Session). Per-file failures never abort a query; they
//! are collected in [`QueryResult::failures`] next to the classes of every
//! file that did parse.

mod directory;
mod file_set;

use std::path::PathBuf;
use std::sync::Arc;

use static_reflection_core::naming::lookup_key;
use static_reflection_core::{ClassRegistry, StaticClass};
use tracing::debug;

use crate::error::FileError;
use crate::session::Session;

pub use directory::DirectoryQuery;
pub use file_set::FileSetQuery;

/// A file that contributed no classes, and why.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: FileError,
}

/// Classes found by a query, in file order, plus the files that failed.
#[derive(Debug, Clone)]
pub struct QueryResult {
    classes: Vec<Arc<StaticClass>>,
    failures: Vec<FileFailure>,
    registry: Arc<ClassRegistry>,
}

impl QueryResult {
    pub(crate) fn new(registry: Arc<ClassRegistry>) -> Self {
        Self {
            classes: Vec::new(),
            failures: Vec::new(),
            registry,
        }
    }

    /// Parse `path` through `session` and record the outcome.
    pub(crate) fn collect(&mut self, session: &Session, path: PathBuf) {
        match session.parse_file(&path) {
            Ok(parsed) => self.classes.extend(parsed.classes().iter().cloned()),
            Err(error) => {
                debug!(file = %path.display(), %error, "recording file failure");
                self.failures.push(FileFailure { path, error });
            }
        }
    }

    pub(crate) fn push_failure(&mut self, path: PathBuf, error: FileError) {
        self.failures.push(FileFailure { path, error });
    }

    pub fn classes(&self) -> &[Arc<StaticClass>] {
        &self.classes
    }

    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Find a class in the result by qualified name (case-insensitive).
    pub fn class(&self, name: &str) -> Option<&Arc<StaticClass>> {
        let key = lookup_key(name);
        self.classes.iter().find(|class| lookup_key(class.name()) == key)
    }

    /// Whether every file parsed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The registry the classes resolve their parents and interfaces in.
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    pub fn into_classes(self) -> Vec<Arc<StaticClass>> {
        self.classes
    }
}
