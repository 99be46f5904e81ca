//! Access control module
//!
//! Gates every request on the authenticated principal: approved domains
//! pass, listed addresses pass, local development passes, everyone else
//! gets a 401.

mod allowlist;

use std::path::Path;
use std::sync::Arc;

use crate::config::AccessConfig;
use crate::logger;

pub use allowlist::{AllowlistError, AllowlistStore, MemoryAllowlist};

/// Value of the dev-mode environment variable when running locally
const LOCAL_DEV_PREFIX: &str = "Development";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
}

impl AccessDecision {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

pub struct AccessFilter {
    approved_domains: Vec<String>,
    local_dev: bool,
    store: Arc<dyn AllowlistStore>,
}

impl AccessFilter {
    pub fn new(
        approved_domains: Vec<String>,
        local_dev: bool,
        store: Arc<dyn AllowlistStore>,
    ) -> Self {
        Self {
            approved_domains,
            local_dev,
            store,
        }
    }

    /// Build from configuration; `env_value` is the current value of `dev_env_var`
    pub fn from_config(
        cfg: &AccessConfig,
        env_value: Option<&str>,
    ) -> Result<Self, AllowlistError> {
        let file = cfg.allowlist_file.as_deref().map(Path::new);
        let store = MemoryAllowlist::load(file, &cfg.allowlist)?;
        let local_dev = detect_local_dev(cfg.local_dev, env_value);
        if local_dev {
            logger::log_warning("Local development mode: access control is bypassed");
        }
        logger::log_info(&format!(
            "[ACCESS] {} approved domain(s), {} allowlisted address(es)",
            cfg.approved_domains.len(),
            store.len()
        ));
        Ok(Self::new(
            cfg.approved_domains.clone(),
            local_dev,
            Arc::new(store),
        ))
    }

    pub const fn local_dev(&self) -> bool {
        self.local_dev
    }

    /// Decide whether `principal` (an email address) may access the site
    pub fn check(&self, principal: Option<&str>) -> AccessDecision {
        if self.local_dev {
            return AccessDecision::Allowed;
        }

        let Some(email) = principal else {
            logger::log_debug("[ACCESS] No authenticated principal");
            return AccessDecision::Denied;
        };

        if self.is_approved_domain(email) {
            return AccessDecision::Allowed;
        }

        match self.store.contains(email) {
            Ok(true) => AccessDecision::Allowed,
            Ok(false) => {
                logger::log_debug(&format!("[ACCESS] Denied: {email}"));
                AccessDecision::Denied
            }
            Err(e) => {
                logger::log_error(&format!("[ACCESS] Allowlist lookup failed for {email}: {e}"));
                AccessDecision::Denied
            }
        }
    }

    fn is_approved_domain(&self, email: &str) -> bool {
        let Some((_, domain)) = email.rsplit_once('@') else {
            return false;
        };
        self.approved_domains
            .iter()
            .any(|approved| approved.eq_ignore_ascii_case(domain))
    }
}

/// Extract the email from an identity header value
///
/// Identity-aware proxies send `accounts.google.com:user@example.com`; the
/// namespace before the first `:` is dropped.
pub fn principal_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    let email = value.split_once(':').map_or(value, |(_, email)| email).trim();
    if email.is_empty() {
        None
    } else {
        Some(email)
    }
}

/// Explicit setting wins; otherwise local when the platform variable says `Development...`
pub fn detect_local_dev(explicit: Option<bool>, env_value: Option<&str>) -> bool {
    explicit.unwrap_or_else(|| env_value.is_some_and(|v| v.starts_with(LOCAL_DEV_PREFIX)))
}
