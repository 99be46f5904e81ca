//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from routing decisions.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_401_response, build_404_response, build_405_response, build_file_response,
    build_options_response, build_permanent_redirect, NOT_FOUND_BODY,
};
