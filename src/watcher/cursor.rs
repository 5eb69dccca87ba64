//! 轮询游标 - 下一次轮询窗口的起点（Unix 时间戳）

use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCursor(i64);

impl PollCursor {
    /// 以当前时间创建
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn at(timestamp: i64) -> Self {
        Self(timestamp)
    }

    pub fn timestamp(self) -> i64 {
        self.0
    }

    /// 推进到服务端返回的 `current_date`
    pub fn advance(&mut self, current_date: i64) {
        self.0 = current_date;
    }
}
