//! config 命令 - 查看和修改设置

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use std::path::Path;

use super::output::render_config;
use crate::config::{Config, ConfigError, SETTABLE_KEYS};

/// 只有未知键才附带可用键列表，其余错误原样上报
fn explain_key_error(err: ConfigError) -> anyhow::Error {
    match err {
        ConfigError::UnknownKey(_) => {
            anyhow!("{} (valid keys: {})", err, SETTABLE_KEYS.join(", "))
        }
        other => other.into(),
    }
}

/// config 子命令
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// 显示当前设置（不输出 token）
    Show,
    /// 设置一个键
    Set {
        /// poll_interval_seconds | webhook_url | github_token | notification_filter
        key: String,
        value: String,
    },
    /// 把一个键重置为默认值
    Unset {
        key: String,
    },
}

/// 处理 config 命令
pub fn handle_config(command: ConfigCommand, config_path: &Path) -> Result<()> {
    let mut config = Config::load(config_path).context("failed to load config")?;

    match command {
        ConfigCommand::Show => {
            print!("{}", render_config(&config, config_path));
        }
        ConfigCommand::Set { key, value } => {
            config
                .set(&key, &value)
                .map_err(explain_key_error)?;
            config.save(config_path).context("failed to save config")?;
            println!("Set {}.", key);
        }
        ConfigCommand::Unset { key } => {
            config
                .unset(&key)
                .map_err(explain_key_error)?;
            config.save(config_path).context("failed to save config")?;
            println!("Unset {}.", key);
        }
    }

    Ok(())
}
