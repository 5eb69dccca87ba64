//! 通知层 - 渠道抽象与去重
//!
//! # 使用示例
//! ```ignore
//! use homework_bot::notification::{ConsoleChannel, NotificationDeduplicator};
//!
//! let channel = ConsoleChannel;
//! let mut dedup = NotificationDeduplicator::new();
//! dedup.notify_if_new("hello", &channel)?;
//! dedup.notify_if_new("hello", &channel)?; // skipped
//! ```

pub mod channel;
pub mod channels;
pub mod deduplicator;

pub use channel::{NotificationChannel, SendResult};
pub use channels::{ConsoleChannel, TelegramChannel, TelegramConfig};
pub use deduplicator::NotificationDeduplicator;
