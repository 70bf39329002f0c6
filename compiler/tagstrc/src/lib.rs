//! tagstr driver.
//!
//! Everything around the rewrite engine that a host needs to use it:
//!
//! - [`config`]: settings from the environment and command line
//! - [`loader`]: the process-wide chain of source loaders that rewrites
//!   opted-in files as they are loaded
//! - [`codec`]: a `tagstr` source encoding that rewrites while decoding
//! - [`diagnostic`]: rewrite errors rendered with source context
//! - [`commands`]: the `tagstr` command line
//!
//! # Debugging
//!
//! Enable tracing with environment variables:
//! - `TAGSTR_LOG=debug` (or `RUST_LOG`) - one event per rewritten expression
//! - `TAGSTR_LOG=tagstr_rewrite=trace` - cursor and matcher steps
//! - `TAGSTR_LOG_TREE=1` - hierarchical span output

use std::sync::Once;

pub mod codec;
pub mod commands;
pub mod config;
pub mod diagnostic;
pub mod loader;

pub use config::Config;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times. Nothing is
/// installed unless the config carries a log filter.
pub fn init_tracing(config: &Config) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        let Some(filter) = config.log_filter.as_deref() else {
            return;
        };
        let tree = config.log_tree.then(|| {
            HierarchicalLayer::new(2)
                .with_targets(true)
                .with_writer(std::io::stderr)
        });
        let flat = (!config.log_tree).then(|| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
        });
        tracing_subscriber::registry()
            .with(EnvFilter::new(filter))
            .with(tree)
            .with(flat)
            .init();
    });
}
