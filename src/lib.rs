//! Homework Bot - 监控作业审核状态并推送到 Telegram

pub mod api;
pub mod config;
pub mod error;
pub mod notification;
pub mod watcher;

pub use api::{ApiConfig, HomeworkRecord, HomeworkSource, HomeworkStatus, PollOutcome, PracticumClient};
pub use config::{check_tokens, Credentials};
pub use error::{BotError, HttpDiagnostics, Recovery};
pub use notification::{ConsoleChannel, NotificationChannel, NotificationDeduplicator, SendResult, TelegramChannel, TelegramConfig};
pub use watcher::{wait_for_worker, CycleOutcome, HomeworkWatcher, PollCursor, Shutdown, STARTUP_MESSAGE};
