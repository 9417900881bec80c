//! broadcast 命令 - 一次性把所有被监控 PR 的当前状态推送出去

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::Path;

use crate::filter::BroadcastFilter;
use crate::notification::NotificationBuilder;
use crate::store::WatchStore;
use crate::watcher::{broadcast, BroadcastReport};

/// broadcast 命令参数
#[derive(Args)]
pub struct BroadcastArgs {
    /// 纳入过滤: all, changed, failing
    #[arg(long, default_value = "all")]
    pub filter: String,

    /// 覆盖配置中的 webhook URL
    #[arg(long)]
    pub webhook: Option<String>,

    /// 只拉取和过滤，不调用 webhook
    #[arg(long)]
    pub dry_run: bool,
}

/// 解析 `--filter`，非法值是启动错误
pub fn parse_filter(value: &str) -> Result<BroadcastFilter> {
    BroadcastFilter::parse(value).ok_or_else(|| {
        anyhow!(
            "invalid --filter value {:?} (expected all, changed, or failing)",
            value
        )
    })
}

/// 结束时的提示语
pub fn summary_line(report: &BroadcastReport) -> Option<&'static str> {
    if report.dry_run {
        Some("Dry-run complete (no webhook calls made).")
    } else if report.delivered == 0 {
        Some("No notifications sent (filter may have excluded all PRs).")
    } else {
        None
    }
}

/// 处理 broadcast 命令
pub async fn handle_broadcast(args: BroadcastArgs, config_path: &Path) -> Result<()> {
    let mut store = WatchStore::load(config_path).context("failed to load config")?;

    if store.is_empty() {
        println!("No PRs being watched.");
        return Ok(());
    }

    let client = super::status_client(store.config())?;
    let filter = parse_filter(&args.filter)?;

    let webhook_url = args
        .webhook
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| store.config().webhook_url.clone());

    let notifier = NotificationBuilder::new()
        .webhook_url(webhook_url)
        .dry_run(args.dry_run)
        .build()?;

    let report = broadcast(&client, &notifier, &mut store, filter).await;

    if let Some(e) = &report.persist_error {
        return Err(anyhow!("failed to save config: {}", e));
    }
    if let Some(line) = summary_line(&report) {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("").unwrap(), BroadcastFilter::All);
        assert_eq!(parse_filter("FAILING").unwrap(), BroadcastFilter::Failing);

        let err = parse_filter("broken").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid --filter value \"broken\" (expected all, changed, or failing)"
        );
    }

    #[test]
    fn test_summary_line() {
        let dry = BroadcastReport {
            dry_run: true,
            ..Default::default()
        };
        assert_eq!(summary_line(&dry), Some("Dry-run complete (no webhook calls made)."));

        let none = BroadcastReport::default();
        assert_eq!(
            summary_line(&none),
            Some("No notifications sent (filter may have excluded all PRs).")
        );

        let sent = BroadcastReport {
            delivered: 2,
            ..Default::default()
        };
        assert_eq!(summary_line(&sent), None);
    }
}
