//! Session - the per-path parse cache.
//!
//! A session owns the parse configuration (naming resolver, doc comment
//! parser) and the [`ClassRegistry`] every parsed class is published to.
//! Files are keyed by canonical path, so a file reached directly and again
//! through a directory scan is read and parsed only once.
//!
//! # Thread Safety
//!
//! `Session` is `Send + Sync`. The cache maps each canonical path to its
//! own `OnceLock`; the map lock is held only to look up that cell, and a
//! second caller asking for a path that is still being parsed blocks on the
//! cell until the first parse finishes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use bumpalo::Bump;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use static_reflection_core::{
    ClassRef, ClassRegistry, DocCommentParser, NamingResolver, StaticClass,
};
use static_reflection_parser::{ParseContext, Parser};
use tracing::{debug, trace, warn};

use crate::error::FileError;

type CacheCell = Arc<OnceLock<Result<ParsedFile, FileError>>>;

/// The classes declared in one successfully parsed file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    path: PathBuf,
    classes: Arc<[Arc<StaticClass>]>,
    // Keeps parent/interface lookups working after the session is gone.
    registry: Arc<ClassRegistry>,
}

impl ParsedFile {
    /// Canonical path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classes and interfaces in declaration order.
    pub fn classes(&self) -> &[Arc<StaticClass>] {
        &self.classes
    }

    /// The registry the classes were published to.
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Files read and parsed (successfully or not).
    pub files_parsed: usize,
    /// Requests answered from the cache.
    pub cache_hits: usize,
}

/// Configuration for a [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    context: ParseContext,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the naming resolver (default: [`NamespaceResolver`](static_reflection_core::NamespaceResolver)).
    pub fn with_resolver(mut self, resolver: Arc<dyn NamingResolver>) -> Self {
        self.context = self.context.with_resolver(resolver);
        self
    }

    /// Set the doc comment parser shared by every file of the session.
    pub fn with_doc_parser(mut self, doc_parser: Arc<dyn DocCommentParser>) -> Self {
        self.context = self.context.with_doc_parser(doc_parser);
        self
    }

    pub fn build(self) -> Session {
        let registry = Arc::new(ClassRegistry::new());
        let context = self.context.with_registry(Arc::downgrade(&registry));
        Session {
            context,
            registry,
            cache: Mutex::new(FxHashMap::default()),
            files_parsed: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
        }
    }
}

/// Parses files at most once each and collects their classes.
#[derive(Debug)]
pub struct Session {
    context: ParseContext,
    registry: Arc<ClassRegistry>,
    cache: Mutex<FxHashMap<PathBuf, CacheCell>>,
    files_parsed: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with the default resolver and doc comment parser.
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Parse `path`, or return the cached outcome of an earlier parse.
    ///
    /// Failures are cached too: a file that did not parse is not retried
    /// within the session.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedFile, FileError> {
        let path = path.as_ref();
        let canonical = fs::canonicalize(path).map_err(|e| FileError::io(path, e))?;

        let cell = {
            let mut cache = self.cache.lock();
            Arc::clone(cache.entry(canonical.clone()).or_default())
        };

        let mut parsed_here = false;
        let outcome = cell.get_or_init(|| {
            parsed_here = true;
            self.load(&canonical)
        });

        if parsed_here {
            self.files_parsed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            trace!(file = %canonical.display(), "cache hit");
        }
        outcome.clone()
    }

    fn load(&self, path: &Path) -> Result<ParsedFile, FileError> {
        let bytes = fs::read(path).map_err(|e| FileError::io(path, e))?;
        // Sources in a legacy 8-bit encoding still lex; only literals suffer.
        let source = String::from_utf8_lossy(&bytes);

        let arena = Bump::new();
        let context = self.context.clone().with_source_file(path);
        match Parser::parse(&source, &arena, &context) {
            Ok(classes) => {
                self.registry.register_all(&classes);
                debug!(file = %path.display(), classes = classes.len(), "parsed file");
                Ok(ParsedFile {
                    path: path.to_path_buf(),
                    classes: classes.into(),
                    registry: Arc::clone(&self.registry),
                })
            }
            Err(errors) => {
                warn!(file = %path.display(), errors = errors.len(), "file failed to parse");
                Err(FileError::Parse {
                    path: path.to_path_buf(),
                    errors,
                })
            }
        }
    }

    /// Look up a class by qualified name among everything parsed so far.
    ///
    /// Returns a null class when no parsed file declares `name`.
    pub fn get_class(&self, name: &str) -> ClassRef {
        self.registry.lookup(name)
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// The parse configuration files are parsed with.
    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            files_parsed: self.files_parsed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }
}
