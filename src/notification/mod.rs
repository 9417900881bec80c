//! 通知 - 把 PR 状态变化送到 console / webhook / 系统通知
//!
//! 每个渠道实现 `NotificationChannel`；`NotificationDispatcher` 依次尝试全部渠道，
//! 任一渠道失败时整体失败，但不会跳过后面的渠道。
//!
//! ```ignore
//! use pr_watcher::notification::{NotificationBuilder, NotificationChannel};
//!
//! let dispatcher = NotificationBuilder::new()
//!     .webhook_url(config.webhook_url.clone())
//!     .native(true)
//!     .build()?;
//! let result = dispatcher.send(&event).await?;
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod event;
pub mod payload;

pub use builder::NotificationBuilder;
pub use channel::{NotificationChannel, SendResult};
pub use channels::{ConsoleChannel, NativeBackend, NativeChannel, WebhookChannel, WebhookConfig};
pub use dispatcher::NotificationDispatcher;
pub use event::StatusChangeEvent;
pub use payload::{WebhookPayload, PAYLOAD_TYPE};
