//! The `load` command: read a file the way a host import would.

use std::path::Path;

use crate::diagnostic::render_transform_error;
use crate::loader::{self, LoadError};
use crate::Config;

/// Load `path` through the process-wide loader chain and print the source.
///
/// The rewriting loader is registered first unless
/// `TAGSTR_DISABLE_IMPORT_HOOK=true`.
pub fn run_load(path: &str, config: &Config) {
    loader::register_from_env(config);
    tracing::debug!(loaders = ?loader::registered_loaders(), "loader chain");

    match loader::load_source(Path::new(path)) {
        Ok(loaded) => {
            let via = if loaded.transformed { "rewritten" } else { "verbatim" };
            eprintln!("{path}: loaded {via}");
            println!("{}", loaded.source);
        }
        Err(LoadError::Transform { text, error, .. }) => {
            eprint!("{}", render_transform_error(&error, path, &text, config.color));
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
