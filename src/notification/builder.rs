//! 通知系统构建器 - 根据配置组装渠道

use super::channels::{ConsoleChannel, NativeChannel, WebhookChannel, WebhookConfig};
use super::dispatcher::NotificationDispatcher;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// 通知系统构建器
///
/// 渠道顺序固定：console → webhook → native。
pub struct NotificationBuilder {
    webhook_url: Option<String>,
    native: bool,
    dry_run: bool,
}

impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            webhook_url: None,
            native: false,
            dry_run: false,
        }
    }

    /// 设置 webhook URL（空字符串视为未配置）
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.webhook_url = if url.trim().is_empty() { None } else { Some(url) };
        self
    }

    /// 是否启用系统原生通知
    pub fn native(mut self, enable: bool) -> Self {
        self.native = enable;
        self
    }

    /// 设置 dry-run 模式（不注册 webhook，不实际发送）
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 构建 NotificationDispatcher
    pub fn build(self) -> Result<NotificationDispatcher> {
        let mut dispatcher = NotificationDispatcher::new().with_dry_run(self.dry_run);

        dispatcher.register_channel(Arc::new(ConsoleChannel::new()));

        if let Some(url) = self.webhook_url {
            if self.dry_run {
                info!(channel = "webhook", "Dry-run: webhook channel disabled");
            } else {
                let channel = WebhookChannel::new(WebhookConfig::new(url))?;
                dispatcher.register_channel(Arc::new(channel));
            }
        }

        if self.native {
            let channel = NativeChannel::new();
            if !channel.is_enabled() {
                info!(channel = "native", "Native notifications not available on this system");
            }
            dispatcher.register_channel(Arc::new(channel));
        }

        Ok(dispatcher)
    }
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
