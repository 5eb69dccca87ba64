//! 通知去重器 - 防止重复发送同一条通知
//!
//! ## 去重策略
//! 只记住最近一次成功发送的文本：与之相同则跳过，不同则发送并替换。
//! 状态只有一个槽位，不会随运行时间增长；进程重启后清空。
//!
//! 对于 A, A, B, A 的序列，会发送 A, B, A。

use tracing::debug;

use super::channel::{NotificationChannel, SendResult};
use crate::error::Result;

/// 通知去重器
#[derive(Debug, Default)]
pub struct NotificationDeduplicator {
    /// 最近一次成功发送的消息
    last: Option<String>,
}

impl NotificationDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否应该发送（与上一条不同）
    pub fn should_send(&self, message: &str) -> bool {
        self.last.as_deref() != Some(message)
    }

    /// 最近一次成功发送的消息
    pub fn last_sent(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// 如果消息是新的就发送
    ///
    /// 发送失败时错误原样返回，状态不更新，下次仍会重试发送。
    pub fn notify_if_new<C>(&mut self, message: &str, channel: &C) -> Result<SendResult>
    where
        C: NotificationChannel + ?Sized,
    {
        if !self.should_send(message) {
            debug!(channel = channel.name(), "Notification deduplicated (same as last sent)");
            return Ok(SendResult::Skipped("same as last sent message".to_string()));
        }

        debug!(channel = channel.name(), message = %message, "Sending notification");
        channel.send(message)?;
        self.last = Some(message.to_string());
        Ok(SendResult::Sent)
    }
}
