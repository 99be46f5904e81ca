//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: access control, method
//! validation, path classification and dispatch.

use crate::access::principal_from_header;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{gist, select_main_page, Classification, DeviceClass};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Percent-decoded path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub user_agent: Option<&'a str>,
    pub accept: Option<&'a str>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let principal = header(&parts, &state.config.access.principal_header)
        .and_then(principal_from_header);

    let response = dispatch(&parts, principal, &state).await;

    if state.config.logging.access_log {
        log_access(&parts, principal, &response, remote_addr, started, &state);
    }
    Ok(response)
}

async fn dispatch(
    parts: &Parts,
    principal: Option<&str>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    // 1. Access control runs before anything else
    if let Some(filter) = &state.access {
        if !filter.check(principal).is_allowed() {
            return http::build_401_response();
        }
    }

    // 2. Check HTTP method
    let is_head = match parts.method {
        Method::GET => false,
        Method::HEAD => true,
        Method::OPTIONS => return http::build_options_response(state.config.http.enable_cors),
        ref other => {
            logger::log_debug(&format!("Method not allowed: {other}"));
            return http::build_405_response();
        }
    };

    // 3. Decode the path; undecodable paths cannot name a resource
    let Ok(path) = percent_decode_str(parts.uri.path()).decode_utf8() else {
        logger::log_debug(&format!("Undecodable path: {}", parts.uri.path()));
        return http::build_404_response(is_head);
    };

    let ctx = RequestContext {
        path: &path,
        query: parts.uri.query(),
        is_head,
        user_agent: header(parts, "user-agent"),
        accept: header(parts, "accept"),
    };

    route_request(&ctx, state).await
}

/// Classify the path and render the outcome
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let root = state.root.as_path();
    let classification = state
        .classifier
        .classify(ctx.path, |p| static_files::resource_exists(root, p));
    logger::log_debug(&format!("{} -> {classification:?}", ctx.path));

    match classification {
        Classification::ServeFile(resource) => {
            static_files::serve_file(ctx, root, &resource).await
        }
        Classification::MainPage => {
            let device = DeviceClass::detect(ctx.user_agent, ctx.accept);
            let page = select_main_page(&state.config.site, device);
            static_files::serve_file(ctx, root, page).await
        }
        Classification::GistRedirect(id) => {
            http::build_permanent_redirect(&gist::redirect_location(&id, ctx.query))
        }
        Classification::NotFound => http::build_404_response(ctx.is_head),
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn log_access(
    parts: &Parts,
    principal: Option<&str>,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(parts, "referer").map(ToString::to_string);
    entry.user_agent = header(parts, "user-agent").map(ToString::to_string);
    entry.principal = principal.map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}
