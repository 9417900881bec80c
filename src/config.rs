//! 配置文件 - 全局设置与被监控 PR 列表
//!
//! 默认位置 `~/.prw/config.json`，可通过 `PRW_CONFIG` 环境变量覆盖。

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::filter::NotificationFilter;
use crate::github::PrKey;
use crate::state::CiState;

/// 默认轮询间隔（秒）
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

/// 覆盖配置路径的环境变量
pub const CONFIG_PATH_ENV: &str = "PRW_CONFIG";

/// token 环境变量
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// 可通过 `config set` / `config unset` 修改的键
pub const SETTABLE_KEYS: [&str; 4] = [
    "poll_interval_seconds",
    "webhook_url",
    "github_token",
    "notification_filter",
];

/// 配置校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("poll_interval_seconds must be a positive integer (got {0:?})")]
    InvalidPollInterval(String),
    #[error("notification_filter must be one of: change, fail, success (got {0:?})")]
    InvalidNotificationFilter(String),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("missing GITHUB_TOKEN; set it as an environment variable or configure it with 'prw config set github_token <token>'")]
    MissingToken,
}

/// 被监控的 PR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedPr {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    /// 上次观察到的 head SHA
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub last_known_sha: String,
    /// 上次观察到的 CI 状态，Unknown 表示从未检查
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "CiState::is_unknown"
    )]
    pub last_known_state: CiState,
    /// 上次检查时间
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_last_checked"
    )]
    pub last_checked: Option<DateTime<Utc>>,
    /// 缓存的 PR 标题
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub title: String,
}

impl WatchedPr {
    /// 新建一个从未检查过的条目
    pub fn new(key: PrKey) -> Self {
        Self {
            owner: key.owner,
            repo: key.repo,
            number: key.number,
            last_known_sha: String::new(),
            last_known_state: CiState::Unknown,
            last_checked: None,
            title: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn key(&self) -> PrKey {
        PrKey::new(&self.owner, &self.repo, self.number)
    }

    pub fn matches(&self, key: &PrKey) -> bool {
        self.owner == key.owner && self.repo == key.repo && self.number == key.number
    }
}

/// 旧版本把「从未检查」写成 0001-01-01T00:00:00Z，读取时视为 None
fn deserialize_last_checked<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(value.filter(|ts| ts.year() > 1))
}

/// 显式的 `null` 与缺失字段同样处理，取默认值
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 配置文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 轮询间隔（秒），缺失或为 0 时使用默认值
    #[serde(default, deserialize_with = "null_as_default")]
    pub poll_interval_seconds: u64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub webhook_url: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub github_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_filter: NotificationFilter,
    /// GitHub API 地址（GitHub Enterprise 时使用）
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub api_base_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub watched_prs: Vec<WatchedPr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECS,
            webhook_url: String::new(),
            github_token: String::new(),
            notification_filter: NotificationFilter::Change,
            api_base_url: String::new(),
            watched_prs: Vec::new(),
        }
    }
}

impl Config {
    /// 默认配置路径 `~/.prw/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(".prw").join("config.json"))
    }

    /// 解析配置路径：显式参数 > `PRW_CONFIG` > 默认路径
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// 读取配置；文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if config.poll_interval_seconds == 0 {
            config.poll_interval_seconds = DEFAULT_POLL_INTERVAL_SECS;
        }

        Ok(config)
    }

    /// 写入配置（文件锁 + 临时文件原子替换）
    pub fn save(&self, path: &Path) -> Result<()> {
        use fs2::FileExt;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }

        let lock_path = path.with_extension("json.lock");
        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file {}", lock_path.display()))?;
        lock_file.lock_exclusive()?;

        let result = (|| -> Result<()> {
            let content = serde_json::to_string_pretty(self).context("failed to serialize config")?;
            let tmp_path = path.with_extension("json.tmp");
            fs::write(&tmp_path, content)
                .with_context(|| format!("failed to write config file {}", tmp_path.display()))?;
            restrict_permissions(&tmp_path)?;
            fs::rename(&tmp_path, path)
                .with_context(|| format!("failed to replace config file {}", path.display()))?;
            Ok(())
        })();

        lock_file.unlock()?;
        result
    }

    /// token：配置文件优先，其次 `GITHUB_TOKEN`
    pub fn token(&self) -> Option<String> {
        if !self.github_token.is_empty() {
            return Some(self.github_token.clone());
        }
        std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty())
    }

    /// 同 `token()`，缺失时返回启动错误
    pub fn require_token(&self) -> Result<String, ConfigError> {
        self.token().ok_or(ConfigError::MissingToken)
    }

    /// token 来源描述（不输出 token 本身）
    pub fn token_source(&self) -> &'static str {
        if !self.github_token.is_empty() {
            "config file"
        } else if std::env::var(TOKEN_ENV).map(|t| !t.is_empty()).unwrap_or(false) {
            "environment variable"
        } else {
            "not set"
        }
    }

    /// 实际使用的 API 地址
    pub fn api_base_url(&self) -> &str {
        if self.api_base_url.is_empty() {
            crate::github::DEFAULT_API_BASE_URL
        } else {
            &self.api_base_url
        }
    }

    /// 设置单个键
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "poll_interval_seconds" => {
                self.poll_interval_seconds = parse_poll_interval(value)?;
            }
            "webhook_url" => self.webhook_url = value.trim().to_string(),
            "github_token" => self.github_token = value.trim().to_string(),
            "notification_filter" => {
                self.notification_filter = NotificationFilter::parse(value)
                    .ok_or_else(|| ConfigError::InvalidNotificationFilter(value.to_string()))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// 把单个键重置为默认值
    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "poll_interval_seconds" => self.poll_interval_seconds = DEFAULT_POLL_INTERVAL_SECS,
            "webhook_url" => self.webhook_url.clear(),
            "github_token" => self.github_token.clear(),
            "notification_filter" => self.notification_filter = NotificationFilter::Change,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

/// 轮询间隔必须是正整数
pub fn parse_poll_interval(value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidPollInterval(value.to_string())),
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
