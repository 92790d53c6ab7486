//! Layered application configuration.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. YAML file given with `--config`
//! 3. environment variables prefixed with `CONTACTS__` (`__` separates
//!    nested keys, e.g. `CONTACTS__SERVER__BIND_ADDR`)
//! 4. CLI overrides (`--port`, `--dataset`)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use contacts::ContactsConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "CONTACTS__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub contacts: ContactsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_owned(),
        }
    }
}

/// Cross-origin policy for the HTTP host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    /// Empty means "mirror the request's `Access-Control-Request-Headers`".
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["https://teal-beignet-986b62.netlify.app".to_owned()],
            allowed_methods: ["GET", "POST", "PUT", "PATCH", "DELETE"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            allowed_headers: Vec::new(),
            allow_credentials: true,
            max_age_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Command-line values that override file and environment settings.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub dataset: Option<PathBuf>,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then `CONTACTS__*` env vars.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed or a value has the
    /// wrong type.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::figment(config_path)
            .extract()
            .with_context(|| match config_path {
                Some(path) => format!("failed to parse config file {}", path.display()),
                None => "failed to parse configuration".to_owned(),
            })
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Apply CLI overrides on top of the loaded configuration.
    ///
    /// # Errors
    /// Returns an error if `--port` is given while `server.bind_addr` is not a
    /// valid socket address.
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) -> Result<()> {
        if let Some(port) = overrides.port {
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }
        if let Some(dataset) = &overrides.dataset {
            self.contacts.dataset_path.clone_from(dataset);
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if `server.bind_addr` is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr '{}'", self.server.bind_addr))
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.cors.allowed_origins.len(), 1);
        assert!(cfg.cors.allow_credentials);
        assert_eq!(
            cfg.cors.allowed_methods,
            vec!["GET", "POST", "PUT", "PATCH", "DELETE"]
        );
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert_eq!(cfg.contacts, ContactsConfig::default());
    }

    #[test]
    fn test_yaml_sections_deserialize() {
        let yaml = r#"
server:
  bind_addr: "127.0.0.1:8080"
cors:
  allowed_origins: ["http://localhost:5173"]
  allow_credentials: false
logging:
  level: debug
  format: json
contacts:
  dataset_path: /srv/contacts.json
  allow_missing_dataset: true
"#;
        let cfg: AppConfig = serde_saphyr::from_str(yaml).unwrap();

        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.cors.allowed_origins, vec!["http://localhost:5173"]);
        assert!(!cfg.cors.allow_credentials);
        // untouched keys keep their defaults
        assert_eq!(cfg.cors.allowed_methods.len(), 5);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.contacts.dataset_path, PathBuf::from("/srv/contacts.json"));
        assert!(cfg.contacts.allow_missing_dataset);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<AppConfig, _> = serde_saphyr::from_str("server:\n  port: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_layers_file_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                "server:\n  bind_addr: \"127.0.0.1:4000\"\nlogging:\n  level: warn\n",
            )?;
            jail.set_env("CONTACTS__LOGGING__LEVEL", "debug");
            jail.set_env("CONTACTS__CONTACTS__DATASET_PATH", "people.json");

            let cfg = AppConfig::load(Some(Path::new("config.yaml")))
                .map_err(|e| e.to_string())?;

            assert_eq!(cfg.server.bind_addr, "127.0.0.1:4000");
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.contacts.dataset_path, PathBuf::from("people.json"));
            Ok(())
        });
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "server: [unclosed")?;
            let err = AppConfig::load(Some(Path::new("bad.yaml"))).unwrap_err();
            assert!(err.to_string().contains("failed to parse config file"));
            Ok(())
        });
    }

    #[test]
    fn test_cli_overrides() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(&CliOverrides {
            port: Some(8081),
            dataset: Some(PathBuf::from("other.json")),
        })
        .unwrap();

        assert_eq!(cfg.server.bind_addr, "0.0.0.0:8081");
        assert_eq!(cfg.contacts.dataset_path, PathBuf::from("other.json"));
    }

    #[test]
    fn test_port_override_needs_valid_bind_addr() {
        let mut cfg = AppConfig::default();
        cfg.server.bind_addr = "localhost".to_owned();

        let result = cfg.apply_cli_overrides(&CliOverrides {
            port: Some(1),
            dataset: None,
        });

        assert!(result.is_err());
    }
}
