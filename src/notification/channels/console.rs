//! 控制台渠道 - 把状态变化打印到 stdout

use anyhow::Result;
use async_trait::async_trait;

use crate::notification::channel::{NotificationChannel, SendResult};
use crate::notification::event::StatusChangeEvent;

/// 控制台渠道，总是启用
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }

    /// 渲染通知文本
    pub fn render(event: &StatusChangeEvent) -> String {
        let mut out = String::from("\n🔔 Status Change Detected!\n");
        out.push_str(&format!("   PR: {}/{}#{}\n", event.owner, event.repo, event.number));
        if !event.title.is_empty() {
            out.push_str(&format!("   Title: {}\n", event.title));
        }
        out.push_str(&format!(
            "   Status: {} → {}\n",
            event.previous_state.label(),
            event.current_state.label()
        ));
        out.push_str(&format!("   Link: {}\n", event.url()));
        out.push_str(&format!("   Time: {}\n", event.timestamp_rfc3339()));
        out
    }
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, event: &StatusChangeEvent) -> Result<SendResult> {
        println!("{}", Self::render(event));
        Ok(SendResult::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::PrKey;
    use crate::state::CiState;

    fn event(title: &str) -> StatusChangeEvent {
        StatusChangeEvent::new(
            &PrKey::new("octo", "demo", 3),
            title,
            CiState::Pending,
            CiState::Failure,
            "abc",
        )
    }

    #[test]
    fn test_render_includes_transition_and_link() {
        let text = ConsoleChannel::render(&event("Fix bug"));
        assert!(text.contains("PR: octo/demo#3"));
        assert!(text.contains("Title: Fix bug"));
        assert!(text.contains("Status: pending → failure"));
        assert!(text.contains("Link: https://github.com/octo/demo/pull/3"));
    }

    #[test]
    fn test_render_skips_empty_title() {
        let text = ConsoleChannel::render(&event(""));
        assert!(!text.contains("Title:"));
    }

    #[tokio::test]
    async fn test_console_send_always_succeeds() {
        let result = ConsoleChannel::new().send(&event("x")).await.unwrap();
        assert_eq!(result, SendResult::Sent);
    }
}
