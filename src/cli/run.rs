//! run 命令 - 启动轮询循环，直到 Ctrl+C

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::filter::NotificationFilter;
use crate::notification::NotificationBuilder;
use crate::store::WatchStore;
use crate::watcher::{WatchOutcome, WatchSettings, Watcher};

/// run 命令参数
#[derive(Args)]
pub struct RunArgs {
    /// 本次运行的通知过滤: change, fail, success（默认读配置）
    #[arg(long = "on")]
    pub on: Option<String>,

    /// 同时发送系统原生通知
    #[arg(long)]
    pub native: bool,
}

/// 解析 `--on`，非法值是启动错误
pub fn parse_on(value: &str) -> Result<NotificationFilter> {
    NotificationFilter::parse(value).ok_or_else(|| {
        anyhow!(
            "invalid --on value {:?} (expected change, fail, or success)",
            value
        )
    })
}

/// 处理 run 命令
pub async fn handle_run(args: RunArgs, config_path: &Path, cancel: CancellationToken) -> Result<()> {
    let store = WatchStore::load(config_path).context("failed to load config")?;

    if store.is_empty() {
        println!("No PRs being watched. Add some with 'prw watch <PR_URL>'.");
        return Ok(());
    }

    let mut settings = WatchSettings::from_config(store.config());
    if let Some(on) = args.on.as_deref() {
        settings = settings.with_filter(parse_on(on)?);
    }

    let client = super::status_client(store.config())?;
    let notifier = NotificationBuilder::new()
        .webhook_url(store.config().webhook_url.clone())
        .native(args.native)
        .build()?;

    println!(
        "Starting watcher with {} second poll interval...",
        settings.poll_interval.as_secs()
    );
    println!("Watching {} PR(s). Press Ctrl+C to stop.", store.len());

    let mut watcher = Watcher::new(Arc::new(client), Arc::new(notifier), store, settings);
    match watcher.run(cancel).await {
        WatchOutcome::Cancelled => println!("\nWatcher stopped."),
        WatchOutcome::Idle => println!("No PRs being watched."),
    }

    Ok(())
}
