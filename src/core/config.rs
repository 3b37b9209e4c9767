use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "fxdesk";
const APPLICATION: &str = "fxdesk";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://open.er-api.com".to_string(),
            timeout_secs: 15,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TickerConfig {
    pub refresh_interval_secs: u64,
    pub scroll_interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        TickerConfig {
            refresh_interval_secs: 5 * 60,
            scroll_interval_ms: 70,
        }
    }
}

impl TickerConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms.max(10))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WebConfig {
    pub listen_addr: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub cache_ttl_secs: u64,
    pub ticker: TickerConfig,
    pub web: WebConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            cache_ttl_secs: 300,
            ticker: TickerConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults if there is none.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let yaml_str = r#"
provider:
  base_url: "http://localhost:9000"
ticker:
  refresh_interval_secs: 60
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://localhost:9000");
        assert_eq!(config.provider.timeout(), Duration::from_secs(15));
        assert_eq!(config.provider.user_agent, "Mozilla/5.0");
        assert_eq!(config.ticker.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.ticker.scroll_interval(), Duration::from_millis(70));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.web.listen_addr.port(), 8501);
    }

    #[test]
    fn test_full_config() {
        let yaml_str = r#"
provider:
  base_url: "https://open.er-api.com"
  timeout_secs: 5
  user_agent: "fxdesk-test"
cache_ttl_secs: 30
ticker:
  refresh_interval_secs: 120
  scroll_interval_ms: 100
web:
  listen_addr: "0.0.0.0:8080"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.timeout(), Duration::from_secs(5));
        assert_eq!(config.provider.user_agent, "fxdesk-test");
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert_eq!(config.ticker.scroll_interval(), Duration::from_millis(100));
        assert_eq!(config.web.listen_addr, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_default_path_is_under_project_dir() {
        // Hosts without a home directory have no default path at all.
        if let Ok(path) = AppConfig::default_config_path() {
            assert!(path.ends_with("config.yaml"));
            let text = path.to_string_lossy().to_lowercase();
            assert!(text.contains(APPLICATION));
            assert!(!text.contains("codito"));
        }
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load_from_path(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
