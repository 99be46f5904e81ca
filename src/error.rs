//! Start-up errors
//!
//! Request handling never fails; everything that can go wrong while serving
//! is rendered as a response. These are the errors that stop the process
//! before it starts accepting connections.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

use crate::access::AllowlistError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error(transparent)]
    Allowlist(#[from] AllowlistError),

    #[error("failed to open log files: {0}")]
    Logger(#[source] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
