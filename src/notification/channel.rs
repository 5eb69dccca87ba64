//! 通知渠道 trait 定义

use crate::error::Result;

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（与上一条重复）
    Skipped(String),
}

/// 通知渠道 trait
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 同步发送一条纯文本消息
    ///
    /// 任何底层传输问题都返回 `BotError::NotificationDelivery`
    fn send(&self, text: &str) -> Result<()>;
}

impl<T: NotificationChannel + ?Sized> NotificationChannel for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, text: &str) -> Result<()> {
        (**self).send(text)
    }
}
