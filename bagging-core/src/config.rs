//! Configuration system for Bagging Explorer.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> explicit file -> environment. Callers patch
//! individual fields (e.g. CLI flags) on the returned value.
//! Configuration is loaded from `~/.config/bagging-explorer/config.toml` and/or
//! `.bagging/config.toml` in the workspace directory.

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub demo: DemoConfig,
}

/// Where the proxy server listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// The external training service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, without a trailing `/api/...` path.
    pub base_url: String,
    /// Per-request timeout in seconds (0 = no timeout).
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Offline-demo behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Answer failed training requests with synthetic results.
    pub synthetic_fallback: bool,
    /// Ask the backend for built-in datasets instead of generating placeholders.
    pub remote_datasets: bool,
    /// Seed for placeholder datasets and synthetic results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            synthetic_fallback: true,
            remote_datasets: false,
            seed: None,
        }
    }
}

impl ExplorerConfig {
    /// Sanity checks figment cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                message: format!("backend.base_url must be an http(s) URL, got '{url}'"),
            });
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "server.host must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Render as TOML, e.g. for `config init`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }
}

/// User-level config path, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "bagging", "bagging-explorer")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Workspace-level config path.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".bagging").join("config.toml")
}

/// Load configuration from all layers.
///
/// `explicit` is a config file named on the command line; it must exist.
pub fn load_config(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<ExplorerConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ExplorerConfig::default()));

    // User-level config
    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Toml::file(path));
    }

    // Environment variables (BAGGING_BACKEND__BASE_URL, BAGGING_SERVER__PORT, etc.)
    figment = figment.merge(Env::prefixed("BAGGING_").split("__"));

    let config: ExplorerConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.timeout_secs, 5);
        assert!(config.demo.synthetic_fallback);
        assert!(!config.demo.remote_datasets);
        assert!(config.demo.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = ExplorerConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[backend]"));
        let restored: ExplorerConfig = toml::from_str(&text).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_load_workspace_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".bagging");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[backend]\nbase_url = \"http://10.0.0.5:5000\"\ntimeout_secs = 2\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.backend.timeout_secs, 2);
        // Untouched sections keep their defaults
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(None, Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_explicit_file_over_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".bagging");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[server]\nport = 4000\nhost = \"0.0.0.0\"\n")
            .unwrap();
        let path = dir.path().join("explorer.toml");
        std::fs::write(&path, "[server]\nport = 8088\n[demo]\nseed = 7\n").unwrap();

        let config = load_config(Some(dir.path()), Some(&path)).unwrap();
        assert_eq!(config.server.port, 8088);
        // Keys the explicit file leaves out keep the workspace value
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.demo.seed, Some(7));
    }

    #[test]
    fn test_invalid_backend_url_rejected() {
        let mut config = ExplorerConfig::default();
        config.backend.base_url = "localhost:5000".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
