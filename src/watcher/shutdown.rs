//! 中断后的限时退出

use std::future::Future;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};

/// 等待循环退出的结果
#[derive(Debug, PartialEq, Eq)]
pub enum Shutdown<T> {
    /// 循环在宽限期内结束
    Finished(T),
    /// 宽限期已过，循环仍阻塞在某次请求里
    GraceExpired,
    /// 等待期间再次收到中断
    Interrupted,
}

/// 在 `grace` 内等待 worker 结束；再次中断或超时都会放弃等待
///
/// 放弃等待时 worker 仍在 blocking 线程上运行，调用方应直接退出进程。
pub async fn wait_for_worker<T, F>(
    worker: &mut JoinHandle<T>,
    grace: Duration,
    interrupt: F,
) -> Result<Shutdown<T>, JoinError>
where
    F: Future,
{
    tokio::select! {
        joined = tokio::time::timeout(grace, &mut *worker) => match joined {
            Ok(result) => result.map(Shutdown::Finished),
            Err(_) => Ok(Shutdown::GraceExpired),
        },
        _ = interrupt => Ok(Shutdown::Interrupted),
    }
}
