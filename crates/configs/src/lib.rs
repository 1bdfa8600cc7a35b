use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Where the grid document lives and how its sheets are named.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_document_id")]
    pub document_id: String,
    #[serde(default = "default_document_name")]
    pub document_name: String,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    #[serde(default = "default_songs_sheet")]
    pub songs_sheet: String,
    #[serde(default = "default_roster_prefix")]
    pub roster_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            document_id: default_document_id(),
            document_name: default_document_name(),
            create_if_missing: true,
            songs_sheet: default_songs_sheet(),
            roster_prefix: default_roster_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

impl Default for UiConfig {
    fn default() -> Self { Self { index_path: default_index_path() } }
}

fn default_data_dir() -> String { "data".into() }
fn default_document_id() -> String { "worship-prep".into() }
fn default_document_name() -> String { "LHC Worship Prep".into() }
fn default_true() -> bool { true }
fn default_songs_sheet() -> String { "Songs".into() }
fn default_roster_prefix() -> String { "Roster ".into() }
fn default_index_path() -> String { "frontend/index.html".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

impl AppConfig {
    /// Config file (`CONFIG_PATH`, default `config.toml`) if present, otherwise
    /// defaults overridden by environment variables.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// Only a missing file falls back to the environment; an unreadable or
    /// malformed file is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("读取配置文件失败: {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(cfg.server.worker_threads);
        if let Ok(dir) = std::env::var("STORE_DATA_DIR") {
            cfg.store.data_dir = dir;
        }
        if let Ok(id) = std::env::var("STORE_DOCUMENT_ID") {
            cfg.store.document_id = id;
        }
        if let Ok(path) = std::env::var("UI_INDEX_PATH") {
            cfg.ui.index_path = path;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.document_id.trim().is_empty() {
            return Err(anyhow!("store.document_id 为空"));
        }
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("store.data_dir 为空"));
        }
        if self.songs_sheet.trim().is_empty() {
            return Err(anyhow!("store.songs_sheet 为空"));
        }
        if self.roster_prefix.is_empty() {
            return Err(anyhow!("store.roster_prefix 为空"));
        }
        Ok(())
    }
}
