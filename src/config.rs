//! Runtime configuration.
//!
//! Layering, lowest to highest precedence: built-in defaults, an optional
//! TOML file, the `HOAX_LENS_API_BASE` environment variable, then CLI flags
//! (applied by `main`).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LensError, Result};
use crate::locale::Locale;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_PORT: u16 = 8888;
pub const API_BASE_ENV: &str = "HOAX_LENS_API_BASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the analysis API, e.g. `http://localhost:5000/api`.
    pub api_base: String,
    pub locale: Locale,
    /// Port for the local web front end.
    pub port: u16,
    /// Optional TCP connect timeout; requests themselves are never timed out.
    pub connect_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            locale: Locale::default(),
            port: DEFAULT_PORT,
            connect_timeout_secs: None,
        }
    }
}

impl Config {
    /// Defaults, then `path` if given, then the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    LensError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config
            .with_api_base_override(std::env::var(API_BASE_ENV).ok())
            .validated()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| LensError::Config(e.to_string()))
    }

    /// Replaces the API base when `value` is set and non-blank.
    pub fn with_api_base_override(mut self, value: Option<String>) -> Self {
        if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.api_base = v;
        }
        self
    }

    pub fn validated(self) -> Result<Self> {
        let lower = self.api_base.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(LensError::Config(format!(
                "api_base must be an http(s) URL, got {:?}",
                self.api_base
            )));
        }
        Ok(self)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_local_api() {
        let cfg = Config::default();
        assert_eq!(cfg.api_base, "http://localhost:5000/api");
        assert_eq!(cfg.port, 8888);
        assert_eq!(cfg.locale, Locale::Id);
        assert!(cfg.connect_timeout().is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str(r#"locale = "en""#).unwrap();
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn full_toml_parses() {
        let cfg = Config::from_toml_str(
            r#"
            api_base = "https://hoax.example.id/api"
            locale = "id"
            port = 9000
            connect_timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api_base, "https://hoax.example.id/api");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.connect_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = Config::from_toml_str("retries = 3").unwrap_err();
        assert!(matches!(err, LensError::Config(_)));
    }

    #[test]
    fn env_override_replaces_base() {
        let cfg = Config::default().with_api_base_override(Some("http://10.0.0.5:5000/api".into()));
        assert_eq!(cfg.api_base, "http://10.0.0.5:5000/api");
    }

    #[test]
    fn blank_env_override_ignored() {
        let cfg = Config::default().with_api_base_override(Some("   ".into()));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn non_http_base_rejected() {
        let cfg = Config {
            api_base: "ftp://example.com".into(),
            ..Default::default()
        };
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 7001").unwrap();
        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.port, 7001);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = Config::load(Some(Path::new("/nonexistent/hoax-lens.toml"))).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
