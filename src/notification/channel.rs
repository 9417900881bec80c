//! 通知渠道 trait 定义

use anyhow::Result;
use async_trait::async_trait;

use super::event::StatusChangeEvent;

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（渠道未配置或平台不支持），不算失败
    Skipped(String),
    /// 发送失败
    Failed(String),
}

impl SendResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, SendResult::Failed(_))
    }

    /// 把 `Err` 折叠为 `Failed`
    pub fn from_result(result: Result<SendResult>) -> Self {
        match result {
            Ok(r) => r,
            Err(e) => SendResult::Failed(e.to_string()),
        }
    }
}

/// 通知渠道 trait
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 发送一个状态变化事件
    async fn send(&self, event: &StatusChangeEvent) -> Result<SendResult>;
}
