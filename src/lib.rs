//! Static-content server for a browser-based code playground.
//!
//! Requests pass an optional access filter, are classified into a resource
//! by an ordered rule list, and are answered from the site root.

pub mod access;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
