use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `[api] base_url`
pub const API_URL_ENV: &str = "CONDO_API_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Explicit collection paths by resource name (`fines = "multas/"`)
    #[serde(default)]
    pub resources: HashMap<String, String>,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub facial: FacialConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout; `0` leaves requests unbounded
    #[serde(default)]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Where the CLI keeps the token pair between runs
    #[serde(default = "default_token_file")]
    pub token_file: String,
    /// Refresh proactively when the access token expires within this window
    #[serde(default = "default_refresh_skew_secs")]
    pub refresh_skew_secs: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DiscoveryConfig {
    /// Fail instead of falling back to the first candidate
    #[serde(default)]
    pub strict: bool,
    /// Resources resolved at startup by `check`
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub directory: String,
}

/// Facial recognition terminal
#[derive(Debug, Deserialize, Clone)]
pub struct FacialConfig {
    /// Events collection, relative to the base URL
    #[serde(default = "default_facial_path")]
    pub path: String,
    /// Sent as `X-Terminal-Key`; must match an access terminal on the backend
    #[serde(default)]
    pub terminal_key: String,
}

fn default_facial_path() -> String {
    "facial/events/".to_string()
}

impl Default for FacialConfig {
    fn default() -> Self {
        Self {
            path: default_facial_path(),
            terminal_key: String::new(),
        }
    }
}

fn default_login_path() -> String {
    "auth/login/".to_string()
}

fn default_refresh_path() -> String {
    "auth/refresh/".to_string()
}

fn default_token_file() -> String {
    "target/condo-admin/tokens.json".to_string()
}

fn default_refresh_skew_secs() -> i64 {
    30
}

fn default_export_dir() -> String {
    "target/exports".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            token_file: default_token_file(),
            refresh_skew_secs: default_refresh_skew_secs(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:8000/api/"
timeout_secs = 0

[auth]
login_path = "auth/login/"
refresh_path = "auth/refresh/"
token_file = "target/condo-admin/tokens.json"
refresh_skew_secs = 30

[discovery]
strict = false
required = ["users", "visits", "invoices", "payments", "fines"]

[resources]

[export]
directory = "target/exports"

[facial]
path = "facial/events/"
terminal_key = ""
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `CONDO_API_URL` overrides the base URL in both cases.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = load_file_or_default()?;
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            tracing::info!("Using API URL from {}: {}", API_URL_ENV, url);
            config.api.base_url = url;
        }
    }
    config.api.base_url = normalize_base_url(&config.api.base_url);
    Ok(config)
}

fn load_file_or_default() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return parse_config_file(&config_path);
            } else {
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config_file(path: &Path) -> anyhow::Result<Config> {
    use anyhow::Context;
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Invalid config in {}", path.display()))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Relative paths join onto the base URL, so it must end with `/`.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Resolve a configured path relative to the executable directory
pub fn resolve_path(path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(p);
        }
    }
    PathBuf::from(path)
}
