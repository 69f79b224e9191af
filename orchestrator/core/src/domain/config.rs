// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Control Plane Configuration
//
// Defines the configuration schema for a shareplane control-plane node:
// - Metadata store location and pool size
// - Executor transport settings (scheme, port, base path, timeout)
// - Credential encryption key provisioning
// - Host refresh interval
// - Optional Prometheus listener

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "shareplane.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlPlaneConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub agent: AgentSettings,

    #[serde(default)]
    pub secrets: SecretSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,

    #[serde(default)]
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite connection URL, e.g. `sqlite://shareplane.db` or `sqlite::memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// How the control plane reaches a host's executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_agent_scheme")]
    pub scheme: String,

    #[serde(default = "default_agent_port")]
    pub port: u16,

    /// Path prefix under which the executor serves `<resource>/<action>`
    #[serde(default = "default_agent_base_path")]
    pub base_path: String,

    /// Upper bound for a single dispatch round trip
    #[serde(default = "default_agent_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            scheme: default_agent_scheme(),
            port: default_agent_port(),
            base_path: default_agent_base_path(),
            timeout_secs: default_agent_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretSettings {
    /// Base64-encoded 32-byte key, or `env:VAR_NAME` to read it from the environment
    #[serde(default = "default_secret_key")]
    pub key: String,
}

impl Default for SecretSettings {
    fn default() -> Self {
        Self {
            key: default_secret_key(),
        }
    }
}

impl SecretSettings {
    /// Resolve the configured key material (supports "env:VAR_NAME" syntax)
    pub fn resolve_key(&self) -> anyhow::Result<String> {
        match self.key.strip_prefix("env:") {
            Some(var_name) => std::env::var(var_name)
                .map_err(|_| anyhow::anyhow!("Environment variable not set: {}", var_name)),
            None => Ok(self.key.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_refresh_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_refresh_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Socket address for the Prometheus exporter, e.g. `0.0.0.0:9464`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen: Option<String>,
}

impl ControlPlaneConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate configuration paths, in precedence order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("SHAREPLANE_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from(format!("./{}", DEFAULT_CONFIG_FILE)));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".shareplane").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/shareplane/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Shareplane\\config.yaml"));

        paths
    }

    /// Discover configuration file using precedence order
    /// 1. SHAREPLANE_CONFIG_PATH environment variable
    /// 2. ./shareplane.yaml (working directory)
    /// 3. ~/.shareplane/config.yaml (user home)
    /// 4. /etc/shareplane/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path: fail if missing/invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::warn!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SHAREPLANE_DATABASE_URL") {
            tracing::info!("Environment override: SHAREPLANE_DATABASE_URL");
            self.database.url = url;
        }

        if let Ok(key) = std::env::var("SHAREPLANE_SECRET_KEY") {
            tracing::info!("Environment override: SHAREPLANE_SECRET_KEY");
            self.secrets.key = key;
        }

        if let Ok(val) = std::env::var("SHAREPLANE_AGENT_PORT") {
            match val.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: SHAREPLANE_AGENT_PORT={}", port);
                    self.agent.port = port;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for SHAREPLANE_AGENT_PORT: '{}'. Expected a port number. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url cannot be empty");
        }
        if !self.database.url.starts_with("sqlite:") {
            anyhow::bail!("database.url must be a sqlite: URL, got '{}'", self.database.url);
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }

        match self.agent.scheme.as_str() {
            "http" | "https" => {}
            other => anyhow::bail!("agent.scheme must be http or https, got '{}'", other),
        }
        if self.agent.port == 0 {
            anyhow::bail!("agent.port cannot be 0");
        }
        if self.agent.timeout_secs == 0 {
            anyhow::bail!("agent.timeout_secs must be at least 1");
        }

        if self.secrets.key.trim().is_empty() {
            anyhow::bail!("secrets.key cannot be empty");
        }

        if self.refresh.enabled && self.refresh.interval_secs == 0 {
            anyhow::bail!("refresh.interval_secs must be at least 1 when refresh is enabled");
        }

        if let Some(listen) = &self.metrics.listen {
            listen
                .parse::<std::net::SocketAddr>()
                .map_err(|_| anyhow::anyhow!("metrics.listen '{}' is not a socket address", listen))?;
        }

        Ok(())
    }
}

fn default_database_url() -> String {
    "sqlite://shareplane.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_agent_scheme() -> String {
    "http".to_string()
}

fn default_agent_port() -> u16 {
    8731
}

fn default_agent_base_path() -> String {
    "agent".to_string()
}

fn default_agent_timeout_secs() -> u64 {
    30
}

fn default_secret_key() -> String {
    "env:SHAREPLANE_SECRET_KEY".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}
