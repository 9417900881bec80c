//! 通知分发器 - 管理多个渠道并路由消息

use super::channel::{NotificationChannel, SendResult};
use super::event::StatusChangeEvent;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// 通知分发器 - 按注册顺序把事件发给每个渠道
///
/// 每个渠道都会被尝试，前一个渠道失败不影响后一个；
/// 只要有任意渠道失败，整体结果就是失败。
pub struct NotificationDispatcher {
    /// 所有注册的渠道
    channels: Vec<Arc<dyn NotificationChannel>>,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 创建新的分发器
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// 注册渠道
    pub fn register_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        info!(channel = channel.name(), "Registering notification channel");
        self.channels.push(channel);
    }

    /// 发送到所有渠道，返回每个渠道的结果
    pub async fn send_all(&self, event: &StatusChangeEvent) -> Vec<(String, SendResult)> {
        let mut results = Vec::with_capacity(self.channels.len());

        if self.dry_run {
            println!(
                "[DRY-RUN] {}/{}#{} status={} (prev={})",
                event.owner,
                event.repo,
                event.number,
                event.current_state.label(),
                event.previous_state.label()
            );
            for channel in &self.channels {
                results.push((channel.name().to_string(), SendResult::Skipped("dry-run".to_string())));
            }
            return results;
        }

        for channel in &self.channels {
            let name = channel.name().to_string();
            let result = SendResult::from_result(channel.send(event).await);

            if let SendResult::Failed(reason) = &result {
                warn!(channel = %name, error = %reason, "Channel send failed");
            }

            results.push((name, result));
        }

        results
    }

    /// 获取已注册的渠道数量
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 获取已注册的渠道名称
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationChannel for NotificationDispatcher {
    fn name(&self) -> &str {
        "dispatcher"
    }

    async fn send(&self, event: &StatusChangeEvent) -> Result<SendResult> {
        let results = self.send_all(event).await;

        let failures: Vec<String> = results
            .iter()
            .filter_map(|(name, result)| match result {
                SendResult::Failed(reason) => Some(format!("{}: {}", name, reason)),
                _ => None,
            })
            .collect();

        if !failures.is_empty() {
            return Ok(SendResult::Failed(failures.join("; ")));
        }

        if results.iter().any(|(_, r)| *r == SendResult::Sent) {
            Ok(SendResult::Sent)
        } else {
            Ok(SendResult::Skipped("no channel delivered".to_string()))
        }
    }
}
