//! Allowlist store
//!
//! Read-only view over the set of email addresses granted access in
//! addition to the approved domains. Entries are written out of band.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllowlistError {
    #[error("failed to read allowlist '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse allowlist '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("allowlist store unavailable: {0}")]
    Unavailable(String),
}

/// Exact-match lookup of an email address
pub trait AllowlistStore: Send + Sync {
    fn contains(&self, email: &str) -> Result<bool, AllowlistError>;
}

/// On-disk layout of the allowlist file
#[derive(Debug, Deserialize, Default)]
struct AllowlistFile {
    #[serde(default)]
    emails: Vec<String>,
}

/// Allowlist held in memory, loaded once at start-up
#[derive(Debug, Default)]
pub struct MemoryAllowlist {
    emails: HashSet<String>,
}

impl MemoryAllowlist {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// Load entries from a TOML file and merge in the inline ones
    pub fn load(path: Option<&Path>, inline: &[String]) -> Result<Self, AllowlistError> {
        let mut list = Self::new(inline.iter().cloned());
        if let Some(path) = path {
            let content = fs::read_to_string(path).map_err(|source| AllowlistError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let file: AllowlistFile =
                toml::from_str(&content).map_err(|source| AllowlistError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            list.emails.extend(file.emails);
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl AllowlistStore for MemoryAllowlist {
    fn contains(&self, email: &str) -> Result<bool, AllowlistError> {
        Ok(self.emails.contains(email))
    }
}
