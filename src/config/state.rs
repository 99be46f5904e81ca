// Application state module
// Immutable per-process state shared by every request handler

use std::path::PathBuf;

use super::types::Config;
use crate::access::AccessFilter;
use crate::error::StartupError;
use crate::routing::Classifier;

/// Application state
///
/// Built once at start-up and shared behind an `Arc`; nothing in here is
/// mutated while serving.
pub struct AppState {
    pub config: Config,
    pub classifier: Classifier,
    /// `None` when access control is disabled
    pub access: Option<AccessFilter>,
    pub root: PathBuf,
}

impl AppState {
    /// Build state from configuration, loading the allowlist when access control is on
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let access = if config.access.enabled {
            let env_value = std::env::var(&config.access.dev_env_var).ok();
            Some(AccessFilter::from_config(
                &config.access,
                env_value.as_deref(),
            )?)
        } else {
            None
        };
        Ok(Self::with_access_filter(config, access))
    }

    /// Build state with an explicit access filter (or none)
    pub fn with_access_filter(config: Config, access: Option<AccessFilter>) -> Self {
        let classifier = Classifier::from_config(&config.site);
        let root = PathBuf::from(&config.site.root);
        Self {
            config,
            classifier,
            access,
            root,
        }
    }
}
