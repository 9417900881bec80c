//! watch / unwatch 命令 - 维护被监控 PR 列表

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use crate::config::WatchedPr;
use crate::github::{parse_pr_url, StatusClient};
use crate::store::WatchStore;

/// watch 命令参数
#[derive(Args)]
pub struct WatchArgs {
    /// PR 地址，例如 https://github.com/owner/repo/pull/123
    pub url: String,
}

/// unwatch 命令参数
#[derive(Args)]
pub struct UnwatchArgs {
    /// PR 地址
    pub url: String,
}

/// 处理 watch 命令
///
/// 先拉取一次 PR 校验其存在并缓存标题；已在列表中时只提示，不报错。
pub async fn handle_watch(args: WatchArgs, config_path: &Path) -> Result<()> {
    let key = parse_pr_url(&args.url).context("invalid PR URL")?;
    let mut store = WatchStore::load(config_path).context("failed to load config")?;

    let client = super::status_client(store.config())?;
    let head = client
        .fetch_head(&key)
        .await
        .context("failed to fetch PR")?;

    if !store.add(WatchedPr::new(key.clone()).with_title(head.title.clone())) {
        println!("PR {} is already being watched.", key);
        return Ok(());
    }

    store.persist().context("failed to save config")?;
    println!("Now watching: {} - {}", key, head.title);
    Ok(())
}

/// 处理 unwatch 命令
pub fn handle_unwatch(args: UnwatchArgs, config_path: &Path) -> Result<()> {
    let key = parse_pr_url(&args.url).context("invalid PR URL")?;
    let mut store = WatchStore::load(config_path).context("failed to load config")?;

    if !store.remove(&key) {
        println!("PR {} is not being watched.", key);
        return Ok(());
    }

    store.persist().context("failed to save config")?;
    println!("Stopped watching: {}", key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::github::PrKey;
    use tempfile::TempDir;

    #[test]
    fn test_unwatch_removes_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut store = WatchStore::new(Config::default(), &path);
        store.add(WatchedPr::new(PrKey::new("o", "r", 1)));
        store.add(WatchedPr::new(PrKey::new("o", "r", 2)));
        store.persist().unwrap();

        handle_unwatch(
            UnwatchArgs {
                url: "https://github.com/o/r/pull/1".to_string(),
            },
            &path,
        )
        .unwrap();

        let reloaded = WatchStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.watched()[0].number, 2);
    }

    #[test]
    fn test_unwatch_missing_pr_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        handle_unwatch(
            UnwatchArgs {
                url: "github.com/o/r/pull/9".to_string(),
            },
            &path,
        )
        .unwrap();
        // 没有任何改动时不写盘
        assert!(!path.exists());
    }

    #[test]
    fn test_unwatch_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        let err = handle_unwatch(
            UnwatchArgs {
                url: "https://example.com/nope".to_string(),
            },
            &dir.path().join("config.json"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid PR URL"));
    }
}
