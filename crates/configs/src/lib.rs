use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
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
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 4000 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Which store backend a connection string selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Postgres or SQLite through SeaORM.
    Sql,
    /// JSON document file, `file:<path>`.
    JsonFile,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file does not exist, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_with(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Apply overrides from `lookup` (normally the process environment) and validate.
    pub fn normalize_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.server.normalize_with(&lookup)?;
        // TOML 未提供连接串时从环境变量读取
        self.database.fill_url_with(&lookup);
        self.database.validate()?;
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize_with<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow!("SERVER_PORT must be an integer in 1..=65535, got {port:?}"))?;
        }
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DatabaseConfig {
    fn fill_url_with<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL").or_else(|| lookup("DB_URI")) {
                self.url = url;
            }
        }
    }

    pub fn store_kind(&self) -> Result<StoreKind> {
        let lower = self.url.trim().to_lowercase();
        if lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:") {
            Ok(StoreKind::Sql)
        } else if lower.starts_with("file:") {
            Ok(StoreKind::JsonFile)
        } else {
            Err(anyhow!("database.url must start with postgres://, postgresql://, sqlite: or file:"))
        }
    }

    /// Path of the JSON document file for `file:` urls.
    pub fn file_path(&self) -> Option<&str> {
        let url = self.url.trim();
        match (url.get(..5), url.get(5..)) {
            (Some(scheme), Some(rest)) if scheme.eq_ignore_ascii_case("file:") => Some(rest.trim_start_matches("//")),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or via DATABASE_URL / DB_URI"));
        }
        if self.store_kind()? == StoreKind::JsonFile && self.file_path().map_or(true, str::is_empty) {
            return Err(anyhow!("database.url file: scheme needs a path"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_to_empty_file() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.min_connections, 1);
    }

    #[test]
    fn url_falls_back_to_db_uri() {
        let mut cfg = AppConfig::default();
        cfg.normalize_with(env(&[("DB_URI", "postgres://u:p@localhost/cars")])).unwrap();
        assert_eq!(cfg.database.url, "postgres://u:p@localhost/cars");
        assert_eq!(cfg.database.store_kind().unwrap(), StoreKind::Sql);
    }

    #[test]
    fn database_url_wins_over_db_uri() {
        let mut cfg = AppConfig::default();
        cfg.normalize_with(env(&[("DATABASE_URL", "sqlite::memory:"), ("DB_URI", "postgres://x/y")])).unwrap();
        assert_eq!(cfg.database.url, "sqlite::memory:");
    }

    #[test]
    fn file_url_is_json_store() {
        let mut cfg = parse("[database]\nurl = \"file:data/cars.json\"\n").unwrap();
        cfg.normalize_with(env(&[])).unwrap();
        assert_eq!(cfg.database.store_kind().unwrap(), StoreKind::JsonFile);
        assert_eq!(cfg.database.file_path(), Some("data/cars.json"));
    }

    #[test]
    fn missing_url_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_with(env(&[])).is_err());
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_with(env(&[("DATABASE_URL", "mongodb://localhost")])).is_err());
    }

    #[test]
    fn server_env_overrides() {
        let mut cfg = parse("[server]\nhost = \"0.0.0.0\"\nport = 9000\n").unwrap();
        cfg.normalize_with(env(&[("SERVER_PORT", "4100"), ("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 4100);
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn bad_server_port_env_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_with(env(&[("SERVER_PORT", "eighty"), ("DATABASE_URL", "sqlite::memory:")])).is_err());
    }
}
