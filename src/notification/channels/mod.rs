//! 具体渠道实现

pub mod console;
pub mod native;
pub mod webhook;

pub use console::ConsoleChannel;
pub use native::{NativeBackend, NativeChannel};
pub use webhook::{WebhookChannel, WebhookConfig};
