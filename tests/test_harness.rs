// tests/test_harness.rs
//! Test harness for the static reflection integration tests
//!
//! Loads fixture sources from `test_scripts/` through a shared session and
//! provides helpers for looking at the resulting classes and errors.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use static_reflection::prelude::*;

/// Test harness for loading fixture files through one session
pub struct TestHarness {
    test_scripts_dir: PathBuf,
    pub session: Session,
}

impl TestHarness {
    /// Create a new test harness
    pub fn new() -> Self {
        let test_scripts_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_scripts");
        Self {
            test_scripts_dir,
            session: Session::new(),
        }
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.test_scripts_dir.join(filename)
    }

    pub fn source(&self, filename: &str) -> String {
        let path = self.path(filename);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Parse a fixture, returning the session's outcome
    pub fn load(&self, filename: &str) -> Result<ParsedFile, FileError> {
        self.session.parse_file(self.path(filename))
    }

    /// Parse a fixture that must parse cleanly
    pub fn load_ok(&self, filename: &str) -> ParsedFile {
        match self.load(filename) {
            Ok(parsed) => parsed,
            Err(error) => {
                let source = self.source(filename);
                eprintln!("Source:\n{}", source);
                if let Some(errors) = error.parse_errors() {
                    eprintln!("\nErrors:");
                    for err in errors {
                        eprintln!("{}", err.display_with_source(&source));
                    }
                }
                panic!("Expected {} to parse, got: {}", filename, error);
            }
        }
    }

    /// Parse a fixture that must fail to parse
    pub fn load_err(&self, filename: &str) -> FileError {
        match self.load(filename) {
            Ok(parsed) => panic!(
                "Expected {} to fail, but it declared {} classes",
                filename,
                parsed.classes().len()
            ),
            Err(error) => error,
        }
    }

    /// Look up a class among everything loaded so far
    pub fn class(&self, name: &str) -> Arc<StaticClass> {
        self.session
            .get_class(name)
            .into_static()
            .unwrap_or_else(|| panic!("class {} was not parsed", name))
    }
}

/// Sorted member names, for order-independent comparisons
pub fn method_names(class: &StaticClass) -> Vec<String> {
    let mut names: Vec<_> = class.methods().iter().map(|m| m.name().to_string()).collect();
    names.sort();
    names
}
