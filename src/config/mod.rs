// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::StartupError;

// Re-export public types
pub use state::AppState;
pub use types::{
    AccessConfig, Config, GistMode, HttpConfig, LoggingConfig, PerformanceConfig,
    ReservedPrefix, ServerConfig, SiteConfig, Strategy,
};

/// Environment variable prefix, e.g. `PLAYGROUND__SERVER__PORT=9000`
const ENV_PREFIX: &str = "PLAYGROUND";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, lowest priority first: compiled defaults, the file, the environment.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Compiled defaults only, no file or environment
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&mut self, root: Option<String>, port: Option<u16>) {
        if let Some(root) = root {
            self.site.root = root;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| StartupError::Address { addr, source })
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.enable_cors", true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.site.strategy, Strategy::Segmented);
        assert_eq!(cfg.site.gist_mode, GistMode::Rewrite);
        assert_eq!(cfg.site.main_page, "index.html");
        assert_eq!(cfg.site.reserved_prefixes.len(), 3);
        assert!(!cfg.access.enabled);
        assert_eq!(cfg.access.approved_domains, vec!["google.com".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[site]
root = "public"
strategy = "flat"
gist_mode = "redirect"
mobile_page = "mobile.html"

[access]
enabled = true
allowlist = ["friend@example.com"]
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.site.root, "public");
        assert_eq!(cfg.site.strategy, Strategy::Flat);
        assert_eq!(cfg.site.gist_mode, GistMode::Redirect);
        assert_eq!(cfg.site.mobile_page.as_deref(), Some("mobile.html"));
        // Unset nested fields keep their defaults
        assert_eq!(cfg.site.main_page, "index.html");
        assert!(cfg.access.enabled);
        assert_eq!(cfg.access.allowlist, vec!["friend@example.com".to_string()]);
        assert_eq!(cfg.access.principal_header, "x-goog-authenticated-user-email");
    }

    #[test]
    fn test_overrides_and_socket_addr() {
        let mut cfg = Config::defaults().unwrap();
        cfg.apply_overrides(Some("dist".to_string()), Some(3000));
        assert_eq!(cfg.site.root, "dist");
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 3000);

        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
