//! Source loaders.
//!
//! A [`LoaderChain`] holds loaders in priority order; loading a path asks
//! each in turn and the first to accept it wins. The default chain reads
//! `.py` files verbatim. Registering puts the [`TagstrLoader`] in front, so
//! files that opt in are rewritten as they are loaded and all others fall
//! through to the plain loader.
//!
//! The process-wide chain behind [`register`], [`unregister`] and
//! [`load_source`] is shared by every thread.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tagstr_rewrite::{transform_str, ActivationConfig, TransformError};
use thiserror::Error;

use crate::Config;

/// Source text ready for the host to compile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub source: String,
    /// Produced by the rewriter rather than read verbatim.
    pub transformed: bool,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: {error}", path.display())]
    Transform {
        path: PathBuf,
        /// The text that failed to rewrite, for diagnostics.
        text: String,
        #[source]
        error: TransformError,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no loader accepts {}", path.display())]
    Unhandled { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Transform { path, .. } | LoadError::Io { path, .. } | LoadError::Unhandled { path } => path,
        }
    }
}

/// One way of turning a path into source text.
pub trait SourceLoader: Send + Sync {
    /// Unique name; the chain holds at most one loader per name.
    fn name(&self) -> &'static str;

    /// `Ok(None)` when this loader does not handle `path`.
    fn load(&self, path: &Path) -> Result<Option<LoadedSource>, LoadError>;
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match source.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_owned(),
        None => source,
    })
}

fn is_python(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("py"))
}

/// Rewrites files that opt in through the activation policy.
#[derive(Clone, Debug, Default)]
pub struct TagstrLoader {
    activation: ActivationConfig,
}

impl TagstrLoader {
    pub const NAME: &'static str = "tagstr";

    pub fn new(activation: ActivationConfig) -> Self {
        TagstrLoader { activation }
    }
}

impl SourceLoader for TagstrLoader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[tracing::instrument(level = "debug", skip(self), fields(loader = Self::NAME))]
    fn load(&self, path: &Path) -> Result<Option<LoadedSource>, LoadError> {
        if !self.activation.should_transform_file(path) {
            return Ok(None);
        }
        let original = read_source(path)?;
        let source = transform_str(&original).map_err(|error| LoadError::Transform {
            path: path.to_path_buf(),
            text: original,
            error,
        })?;
        tracing::debug!(path = %path.display(), "loaded rewritten source");
        Ok(Some(LoadedSource {
            path: path.to_path_buf(),
            source,
            transformed: true,
        }))
    }
}

/// Reads any `.py` file verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainLoader;

impl PlainLoader {
    pub const NAME: &'static str = "plain";
}

impl SourceLoader for PlainLoader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn load(&self, path: &Path) -> Result<Option<LoadedSource>, LoadError> {
        if !is_python(path) {
            return Ok(None);
        }
        Ok(Some(LoadedSource {
            path: path.to_path_buf(),
            source: read_source(path)?,
            transformed: false,
        }))
    }
}

/// Loaders in priority order.
#[derive(Clone)]
pub struct LoaderChain {
    loaders: Vec<Arc<dyn SourceLoader>>,
}

impl Default for LoaderChain {
    fn default() -> Self {
        LoaderChain {
            loaders: vec![Arc::new(PlainLoader)],
        }
    }
}

impl std::fmt::Debug for LoaderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl LoaderChain {
    pub fn empty() -> Self {
        LoaderChain { loaders: Vec::new() }
    }

    /// Put `loader` first, replacing any loader with the same name.
    pub fn insert_front(&mut self, loader: Arc<dyn SourceLoader>) {
        self.remove(loader.name());
        self.loaders.insert(0, loader);
    }

    /// Remove the loader called `name`. Returns whether one was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.loaders.len();
        self.loaders.retain(|l| l.name() != name);
        self.loaders.len() != before
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Load through the first loader that accepts `path`.
    pub fn load(&self, path: &Path) -> Result<LoadedSource, LoadError> {
        for loader in &self.loaders {
            if let Some(loaded) = loader.load(path)? {
                tracing::trace!(loader = loader.name(), path = %path.display(), "loader accepted");
                return Ok(loaded);
            }
        }
        Err(LoadError::Unhandled {
            path: path.to_path_buf(),
        })
    }
}

static CHAIN: Lazy<RwLock<LoaderChain>> = Lazy::new(|| RwLock::new(LoaderChain::default()));

/// Put the rewriting loader at the front of the process-wide chain.
///
/// Registering again replaces the earlier registration.
pub fn register(config: &Config) {
    CHAIN
        .write()
        .insert_front(Arc::new(TagstrLoader::new(config.activation())));
    tracing::debug!(module = %config.module, "registered tagstr loader");
}

/// Remove the rewriting loader. Returns whether it was registered.
pub fn unregister() -> bool {
    CHAIN.write().remove(TagstrLoader::NAME)
}

/// [`register`] unless `TAGSTR_DISABLE_IMPORT_HOOK` is set. Returns whether
/// the loader was registered.
pub fn register_from_env(config: &Config) -> bool {
    if config.disable_import_hook {
        tracing::debug!("import hook disabled by environment");
        return false;
    }
    register(config);
    true
}

/// Load `path` through the process-wide chain.
pub fn load_source(path: &Path) -> Result<LoadedSource, LoadError> {
    CHAIN.read().load(path)
}

/// Names of the loaders in the process-wide chain, first to last.
pub fn registered_loaders() -> Vec<&'static str> {
    CHAIN.read().names()
}
