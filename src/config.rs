use crate::error::ScrapeError;
use crate::http_client::{FetchClient, FetchConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENTS};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraping: ScrapingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrapingConfig {
    /// Base origin of the source site.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total fetch timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Outbound identity pool; must not be empty.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,

    /// Approximate catalog size used for pagination. The source site does
    /// not expose a reliable total-count element, so listing pagination is
    /// computed from this constant rather than scraped.
    #[serde(default = "default_catalog_total")]
    pub catalog_total: u32,

    /// Items per catalog browse page on the source site.
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}
fn default_catalog_total() -> u32 {
    3564
}
fn default_catalog_page_size() -> u32 {
    36
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agents: default_user_agents(),
            catalog_total: default_catalog_total(),
            catalog_page_size: default_catalog_page_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            scraping: ScrapingConfig::default(),
        }
    }
}

impl Config {
    /// Loads `config.toml` when present, falling back to defaults, then
    /// applies environment overrides (`SCRAPING_URL`, `PORT`).
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_env();
        config
    }

    fn load_file() -> Self {
        let path = Path::new("config.toml");
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("ignoring malformed config.toml: {}", e),
                }
            }
        }
        Self::default()
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("SCRAPING_URL") {
            if !url.is_empty() {
                self.scraping.base_url = url;
            }
        }
        if let Ok(port) = env::var("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => log::warn!("ignoring non-numeric PORT {:?}", port),
            }
        }
    }
}

impl ScrapingConfig {
    /// Create a fetch client from this configuration.
    pub fn create_fetch_client(&self) -> Result<FetchClient, ScrapeError> {
        FetchClient::with_config(FetchConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            user_agents: self.user_agents.clone(),
        })
    }
}
