//! 作业监控子系统 - 轮询/通知循环及其游标

mod cursor;
mod homework_watcher;
mod shutdown;

pub use cursor::PollCursor;
pub use homework_watcher::{CycleOutcome, HomeworkWatcher, STARTUP_MESSAGE};
pub use shutdown::{wait_for_worker, Shutdown};
