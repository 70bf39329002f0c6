//! Driver settings.
//!
//! Assembled from the environment first, then overridden by command line
//! flags:
//!
//! | Variable | Flag | Meaning |
//! |---|---|---|
//! | `TAGSTR_MODULE` | `--module=<name>` | module name in `# <name>: on` and `import <name>` |
//! | `TAGSTR_DISABLE_IMPORT_HOOK` | | `true` skips loader registration |
//! | `TAGSTR_LOG`, `RUST_LOG` | `--log=<filter>` | tracing filter |
//! | `TAGSTR_LOG_TREE` | | hierarchical tracing output |
//! | `NO_COLOR` | `--no-color` | plain diagnostics |
//! | | `--jobs=<n>` | worker threads for `build` |

use tagstr_rewrite::ActivationConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub module: String,
    pub disable_import_hook: bool,
    pub log_filter: Option<String>,
    pub log_tree: bool,
    pub color: bool,
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            module: ActivationConfig::default().module,
            disable_import_hook: false,
            log_filter: None,
            log_tree: false,
            color: true,
            jobs: None,
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an environment lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(module) = lookup("TAGSTR_MODULE").filter(|m| !m.is_empty()) {
            config.module = module;
        }
        config.disable_import_hook = lookup("TAGSTR_DISABLE_IMPORT_HOOK")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        config.log_filter = lookup("TAGSTR_LOG").or_else(|| lookup("RUST_LOG"));
        config.log_tree = lookup("TAGSTR_LOG_TREE").is_some_and(|v| !v.is_empty());
        config.color = !lookup("NO_COLOR").is_some_and(|v| !v.is_empty());
        config
    }

    /// Apply one global flag. Returns `false` when `arg` is not one.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, String> {
        if let Some(module) = arg.strip_prefix("--module=") {
            if module.is_empty() {
                return Err("--module needs a name".to_owned());
            }
            self.module = module.to_owned();
        } else if let Some(jobs) = arg.strip_prefix("--jobs=") {
            let jobs: usize = jobs
                .parse()
                .map_err(|_| format!("invalid --jobs value '{jobs}'"))?;
            self.jobs = Some(jobs.max(1));
        } else if let Some(filter) = arg.strip_prefix("--log=") {
            self.log_filter = Some(filter.to_owned());
        } else if arg == "--no-color" {
            self.color = false;
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    pub fn activation(&self) -> ActivationConfig {
        ActivationConfig::new(self.module.clone())
    }
}

#[cfg(test)]
mod tests;
