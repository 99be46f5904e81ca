//! Static file serving module
//!
//! Resolves resource paths under the site root, loads them and builds the response.

use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolve a root-relative resource path to a regular file inside `root`
///
/// Anything that escapes the root after canonicalization (`..`, absolute
/// segments, symlinks pointing outside) is treated as absent.
pub fn resolve(root: &Path, relative: &str) -> Option<PathBuf> {
    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // Not found is the common case, no need to log it
    let canonical = root.join(relative).canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            canonical.display()
        ));
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Whether `relative` names a servable file under `root`
pub fn resource_exists(root: &Path, relative: &str) -> bool {
    resolve(root, relative).is_some()
}

/// Load a resource and its content type
///
/// The content type follows the requested name, not a symlink target's.
pub async fn load_file(root: &Path, relative: &str) -> Option<(Vec<u8>, &'static str)> {
    let file_path = resolve(root, relative)?;

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    Some((content, mime::content_type_for_path(Path::new(relative))))
}

/// Serve a single resource, or the 404 page when it is absent
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    root: &Path,
    relative: &str,
) -> Response<Full<Bytes>> {
    match load_file(root, relative).await {
        Some((content, content_type)) => {
            http::build_file_response(Bytes::from(content), content_type, ctx.is_head)
        }
        None => {
            logger::log_debug(&format!("Not found: {relative} (request {})", ctx.path));
            http::build_404_response(ctx.is_head)
        }
    }
}
