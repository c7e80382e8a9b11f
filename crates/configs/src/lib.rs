use anyhow::{anyhow, Context, Result};
use common::utils::logging::LogFormat;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_api_v1_prefix")]
    pub api_v1_prefix: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { project_name: default_project_name(), api_v1_prefix: default_api_v1_prefix() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { url: default_redis_url(), connect_timeout_secs: default_connect_timeout() }
    }
}

/// Which key-value backend the server wires into the binding service.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("store.backend must be redis or memory, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub format: Option<String>,
}

fn default_project_name() -> String { "Phone Address Service".to_string() }
fn default_api_v1_prefix() -> String { "/api/v1".to_string() }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_redis_url() -> String { "redis://redis:6379/0".to_string() }
fn default_connect_timeout() -> u64 { 5 }

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (if present) → process environment → normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path).with_context(|| format!("reading {path}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_from(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay values from an environment lookup. Unset variables keep the current value.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PROJECT_NAME") { self.app.project_name = v; }
        if let Some(v) = lookup("API_V1_PREFIX") { self.app.api_v1_prefix = v; }
        if let Some(v) = lookup("REDIS_URL") { self.redis.url = v; }
        if let Some(v) = lookup("REDIS_CONNECT_TIMEOUT_SECS") {
            self.redis.connect_timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("REDIS_CONNECT_TIMEOUT_SECS is not a number: {v}"))?;
        }
        if let Some(v) = lookup("STORE_BACKEND") { self.store.backend = v.parse()?; }
        if let Some(v) = lookup("SERVER_HOST") { self.server.host = v; }
        if let Some(v) = lookup("SERVER_PORT") {
            self.server.port = v
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT is not a valid port: {v}"))?;
        }
        if let Some(v) = lookup("TOKIO_WORKER_THREADS") {
            let threads: usize = v
                .trim()
                .parse()
                .with_context(|| format!("TOKIO_WORKER_THREADS is not a number: {v}"))?;
            self.server.worker_threads = Some(threads);
        }
        if let Some(v) = lookup("LOG_FORMAT") { self.log.format = Some(v); }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.app.normalize()?;
        self.server.normalize()?;
        self.redis.validate()?;
        self.log.log_format()?;
        Ok(())
    }
}

impl AppSettings {
    fn normalize(&mut self) -> Result<()> {
        let trimmed = self.api_v1_prefix.trim().trim_end_matches('/');
        if !trimmed.is_empty() && !trimmed.starts_with('/') {
            return Err(anyhow!("app.api_v1_prefix must start with '/': {}", self.api_v1_prefix));
        }
        self.api_v1_prefix = trimmed.to_string();
        if self.project_name.trim().is_empty() {
            self.project_name = default_project_name();
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RedisConfig {
    pub fn validate(&self) -> Result<()> {
        let lower = self.url.trim().to_lowercase();
        let schemes = ["redis://", "rediss://", "redis+unix://", "unix://"];
        if !schemes.iter().any(|s| lower.starts_with(s)) {
            return Err(anyhow!(
                "redis.url must start with redis://, rediss://, redis+unix:// or unix://"
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("redis.connect_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl LogConfig {
    pub fn log_format(&self) -> Result<LogFormat> {
        match self.format.as_deref() {
            None => Ok(LogFormat::default()),
            Some(s) => s.parse().map_err(|e: String| anyhow!(e)),
        }
    }
}
