// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Answer OPTIONS with permissive CORS headers
    pub enable_cors: bool,
}

/// Which rule list the classifier evaluates
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Multi-segment rewriting: real files, dotted names, reserved prefixes, gist placeholders
    #[default]
    Segmented,
    /// Single-segment lookup against known files and routes
    Flat,
}

/// What to do with a bare gist identifier path such as `/0123456789abcdef0123`
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GistMode {
    /// Serve the main page in place
    #[default]
    Rewrite,
    /// 308 to `/?id=<gist>`
    Redirect,
}

/// A top-level segment whose sub-paths are served as real files
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReservedPrefix {
    pub segment: String,
    /// Only reserved when the next segment equals this value
    #[serde(default)]
    pub followed_by: Option<String>,
}

impl ReservedPrefix {
    pub fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            followed_by: None,
        }
    }

    pub fn followed_by(segment: &str, next: &str) -> Self {
        Self {
            segment: segment.to_string(),
            followed_by: Some(next.to_string()),
        }
    }
}

/// Site layout and URL rewriting configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Directory every resource path is resolved against
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub gist_mode: GistMode,
    #[serde(default = "default_main_page")]
    pub main_page: String,
    /// Served instead of `main_page` to mobile clients
    #[serde(default)]
    pub mobile_page: Option<String>,
    #[serde(default = "default_reserved_prefixes")]
    pub reserved_prefixes: Vec<ReservedPrefix>,
    /// Flat strategy: files served by name
    #[serde(default = "default_known_files")]
    pub known_files: Vec<String>,
    /// Flat strategy: pseudo-routes that map to the main page
    #[serde(default = "default_known_routes")]
    pub known_routes: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_root() -> String {
    "web".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_main_page() -> String {
    "index.html".to_string()
}

fn default_reserved_prefixes() -> Vec<ReservedPrefix> {
    vec![
        ReservedPrefix::new("packages"),
        ReservedPrefix::new("experimental"),
        ReservedPrefix::followed_by("scripts", "assets"),
    ]
}

fn default_known_files() -> Vec<String> {
    [
        "dark_mode.js",
        "dart-192.png",
        "embed-dart.html",
        "embed-flutter.html",
        "embed-html.html",
        "embed-inline.html",
        "fav_icon.ico",
        "index.html",
        "inject_embed.dart.js",
        "robots.txt",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_known_routes() -> Vec<String> {
    ["flutter", "dart", "html"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            strategy: Strategy::default(),
            gist_mode: GistMode::default(),
            main_page: default_main_page(),
            mobile_page: None,
            reserved_prefixes: default_reserved_prefixes(),
            known_files: default_known_files(),
            known_routes: default_known_routes(),
        }
    }
}

/// Access control configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccessConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Header carrying the authenticated principal's email
    #[serde(default = "default_principal_header")]
    pub principal_header: String,
    #[serde(default = "default_approved_domains")]
    pub approved_domains: Vec<String>,
    /// Inline allowlist entries, merged with `allowlist_file`
    #[serde(default)]
    pub allowlist: Vec<String>,
    /// TOML file of the form `emails = ["..."]`
    #[serde(default)]
    pub allowlist_file: Option<String>,
    /// Forces local development mode on or off; derived from `dev_env_var` when unset
    #[serde(default)]
    pub local_dev: Option<bool>,
    #[serde(default = "default_dev_env_var")]
    pub dev_env_var: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_principal_header() -> String {
    "x-goog-authenticated-user-email".to_string()
}

fn default_approved_domains() -> Vec<String> {
    vec!["google.com".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_dev_env_var() -> String {
    "SERVER_SOFTWARE".to_string()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            principal_header: default_principal_header(),
            approved_domains: default_approved_domains(),
            allowlist: Vec::new(),
            allowlist_file: None,
            local_dev: None,
            dev_env_var: default_dev_env_var(),
        }
    }
}
