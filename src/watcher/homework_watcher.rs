//! 作业状态监控循环
//!
//! 每个周期：轮询 → 校验 → 翻译 → 去重通知 → 休眠。
//! 轮询和校验错误在周期边界被分类处理，单条作业的错误就地处理，
//! 循环本身不会因此退出；只有 shutdown 信号会结束 `run`。

use serde_json::Value;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn};

use super::cursor::PollCursor;
use crate::api::{check_response, parse_status, HomeworkSource};
use crate::config::RETRY_PERIOD;
use crate::error::{BotError, Recovery, Result};
use crate::notification::{NotificationChannel, NotificationDeduplicator, SendResult};

/// 启动时无条件发送的消息
pub const STARTUP_MESSAGE: &str = "Homework bot is starting up.";

/// 单个周期的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 响应有效；`failed` 为翻译或发送失败的条目数
    Completed {
        homeworks: usize,
        sent: usize,
        failed: usize,
    },
    /// 轮询或响应校验出错，已按策略恢复
    Recovered(Recovery),
}

/// 作业状态监控器
pub struct HomeworkWatcher<S, C> {
    source: S,
    channel: C,
    cursor: PollCursor,
    dedup: NotificationDeduplicator,
    retry_period: Duration,
    cycles: u64,
}

impl<S: HomeworkSource, C: NotificationChannel> HomeworkWatcher<S, C> {
    pub fn new(source: S, channel: C, cursor: PollCursor) -> Self {
        Self {
            source,
            channel,
            cursor,
            dedup: NotificationDeduplicator::new(),
            retry_period: RETRY_PERIOD,
            cycles: 0,
        }
    }

    /// 设置周期间隔（默认 `RETRY_PERIOD`）
    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period;
        self
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// 发送启动通知（不经过去重）
    pub fn announce_start(&self) {
        info!(channel = self.channel.name(), "Bot is ready, sending startup notification");
        if let Err(e) = self.channel.send(STARTUP_MESSAGE) {
            error!(error = %e, "Cannot send startup notification");
        }
    }

    /// 持续运行直到收到 shutdown 信号（或发送端被丢弃）
    pub fn run(&mut self, shutdown: &Receiver<()>) {
        info!(
            cursor = self.cursor.timestamp(),
            retry_secs = self.retry_period.as_secs(),
            "Homework watcher started"
        );
        self.announce_start();

        loop {
            self.run_cycle();
            match shutdown.recv_timeout(self.retry_period) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        info!(cycles = self.cycles, "Homework watcher stopped");
    }

    /// 执行一个周期，错误在此处分类并恢复
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.cycles += 1;
        let span = info_span!("cycle", n = self.cycles, cursor = self.cursor.timestamp());
        let _guard = span.enter();

        match self.poll_and_notify() {
            Ok(outcome) => {
                debug!(?outcome, "Cycle completed");
                outcome
            }
            Err(e) => CycleOutcome::Recovered(self.recover(e)),
        }
    }

    /// 轮询并处理整批作业；单条作业的错误就地恢复，不影响后面的条目
    fn poll_and_notify(&mut self) -> Result<CycleOutcome> {
        let payload = self.source.poll(self.cursor.timestamp())?;
        let response = check_response(&payload)?;

        match response.current_date {
            Some(current_date) => self.cursor.advance(current_date),
            None => warn!(
                cursor = self.cursor.timestamp(),
                "Response has no integer `current_date`, keeping cursor"
            ),
        }

        if response.homeworks.is_empty() {
            debug!("No homework status changes");
        }

        let mut sent = 0;
        let mut failed = 0;
        for item in response.homeworks {
            match self.notify_item(item) {
                Ok(SendResult::Sent) => sent += 1,
                Ok(SendResult::Skipped(_)) => {}
                Err(e) => {
                    failed += 1;
                    self.recover(e);
                }
            }
        }

        Ok(CycleOutcome::Completed {
            homeworks: response.homeworks.len(),
            sent,
            failed,
        })
    }

    fn notify_item(&mut self, item: &Value) -> Result<SendResult> {
        let message = parse_status(item)?;
        info!(message = %message, "Homework status changed");
        self.dedup.notify_if_new(&message, &self.channel)
    }

    fn recover(&mut self, e: BotError) -> Recovery {
        let recovery = e.recovery();
        match recovery {
            Recovery::LogOnly => log_only(&e),
            Recovery::NotifyStatus => {
                error!(error = %e, "Unexpected API response");
                self.report(format!("Unexpected API response status: {}", e.summary()))
            }
            Recovery::NotifyFailure => {
                error!(error = %e, "Program failure");
                self.report(format!("Program failure: {}", e.summary()))
            }
        }
        recovery
    }

    /// 上报故障；发送失败只记录，不再回到通知路径
    fn report(&mut self, message: String) {
        if let Err(e) = self.dedup.notify_if_new(&message, &self.channel) {
            error!(error = %e, "Cannot report failure to chat");
        }
    }
}

fn log_only(e: &BotError) {
    match e {
        BotError::Timeout(_) => warn!(error = %e, "API request timed out"),
        BotError::Connection(_) => error!(error = %e, "API connection failed"),
        BotError::NotificationDelivery(_) => error!(error = %e, "Notification delivery failed"),
        _ => error!(error = %e, "Unexpected request failure"),
    }
}
