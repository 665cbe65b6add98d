//! Server configuration
//!
//! Resolution order: environment variables > `<config_dir>/server.toml` >
//! defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default plaintext HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 3000;
/// Default encrypted (HTTPS) port
pub const DEFAULT_HTTPS_PORT: u16 = 3001;
/// Default backing file for the record store
pub const DEFAULT_DATA_FILE: &str = "./repositories/cupcakes.json";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to bind
    pub host: String,
    /// Plaintext HTTP port
    pub http_port: u16,
    /// Port the TLS-terminating front end listens on
    pub https_port: u16,
    /// Record store backing file
    pub data_file: PathBuf,
}

/// `server.toml` contents; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Host to bind
    pub host: Option<String>,
    /// Plaintext HTTP port
    pub http_port: Option<u16>,
    /// Encrypted port
    pub https_port: Option<u16>,
    /// Record store backing file
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            https_port: DEFAULT_HTTPS_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl Config {
    /// Load `server.toml` from `config_dir`.
    /// Returns None if file doesn't exist or can't be parsed
    pub fn from_file(config_dir: impl AsRef<Path>) -> Option<ConfigFile> {
        let config_path = config_dir.as_ref().join("server.toml");

        if !config_path.exists() {
            tracing::debug!("Server config file not found: {:?}", config_path);
            return None;
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<ConfigFile>(&content) {
                Ok(file) => {
                    tracing::info!("Loaded server configuration from {:?}", config_path);
                    Some(file)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse server config file {:?}: {}", config_path, e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read server config file {:?}: {}", config_path, e);
                None
            }
        }
    }

    /// Load configuration from environment variables and the config file
    pub fn from_env(config_dir: impl AsRef<Path>) -> Self {
        Self::resolve(Self::from_file(config_dir), |key| std::env::var(key).ok())
    }

    /// Layer `file` and then `env` over the defaults.
    ///
    /// Recognised variables: `CUPCAKE_HOST`, `HTTP_PORT`, `HTTPS_PORT`,
    /// `CUPCAKE_DATA_FILE`. A port that does not parse is ignored with a
    /// warning.
    pub fn resolve(file: Option<ConfigFile>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(file) = file {
            if let Some(host) = file.host {
                config.host = host;
            }
            if let Some(port) = file.http_port {
                config.http_port = port;
            }
            if let Some(port) = file.https_port {
                config.https_port = port;
            }
            if let Some(data_file) = file.data_file {
                config.data_file = data_file;
            }
        }

        if let Some(host) = env("CUPCAKE_HOST") {
            config.host = host;
        }
        config.http_port = port_from_env(&env, "HTTP_PORT", config.http_port);
        config.https_port = port_from_env(&env, "HTTPS_PORT", config.https_port);
        if let Some(data_file) = env("CUPCAKE_DATA_FILE") {
            config.data_file = PathBuf::from(data_file);
        }

        config
    }

    /// Address for the plaintext listener
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Set a new data file
    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self
    }
}

fn port_from_env(env: &impl Fn(&str) -> Option<String>, key: &str, current: u16) -> u16 {
    match env(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid {}={:?}: {}", key, raw, e);
            current
        }),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.https_port, 3001);
        assert_eq!(config.http_addr(), "0.0.0.0:3000");
        assert_eq!(config.data_file, PathBuf::from("./repositories/cupcakes.json"));
    }

    #[test]
    fn test_resolve_without_sources_is_default() {
        assert_eq!(Config::resolve(None, env_of(&[])), Config::default());
    }

    #[test]
    fn test_env_overrides_ports_independently() {
        let config = Config::resolve(None, env_of(&[("HTTPS_PORT", "8443")]));
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.https_port, 8443);

        let config = Config::resolve(None, env_of(&[("HTTP_PORT", "8080")]));
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.https_port, 3001);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::resolve(None, env_of(&[("HTTP_PORT", "eighty")]));
        assert_eq!(config.http_port, 3000);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            host: Some("127.0.0.1".to_string()),
            http_port: Some(4000),
            https_port: Some(4001),
            data_file: Some(PathBuf::from("/var/lib/cupcakes.json")),
        };

        let config = Config::resolve(
            Some(file),
            env_of(&[("HTTP_PORT", "5000"), ("CUPCAKE_DATA_FILE", "/tmp/c.json")]),
        );

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.https_port, 4001);
        assert_eq!(config.data_file, PathBuf::from("/tmp/c.json"));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("server.toml"),
            "http_port = 7000\ndata_file = \"/data/cupcakes.json\"\n",
        )
        .unwrap();

        let file = Config::from_file(dir.path()).unwrap();
        assert_eq!(file.http_port, Some(7000));
        assert_eq!(file.https_port, None);
        assert_eq!(file.data_file, Some(PathBuf::from("/data/cupcakes.json")));
    }

    #[test]
    fn test_from_file_missing_or_malformed() {
        let dir = TempDir::new().unwrap();
        assert!(Config::from_file(dir.path()).is_none());

        std::fs::write(dir.path().join("server.toml"), "http_port = \"not a port\"").unwrap();
        assert!(Config::from_file(dir.path()).is_none());
    }

    #[test]
    fn test_with_data_file() {
        let config = Config::default().with_data_file("/custom/cupcakes.json");
        assert_eq!(config.data_file, PathBuf::from("/custom/cupcakes.json"));
    }
}
