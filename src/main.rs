//! Homework Bot CLI
//!
//! 监控作业审核状态，状态变化时推送到 Telegram

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use homework_bot::config::SHUTDOWN_GRACE;
use homework_bot::{
    wait_for_worker, ApiConfig, BotError, ConsoleChannel, Credentials, HomeworkWatcher,
    NotificationChannel, PollCursor, PracticumClient, Shutdown, TelegramChannel, TelegramConfig,
};

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Homework Bot - 监控作业审核状态并推送到 Telegram")]
#[command(version)]
struct Cli {
    /// 从指定 dotenv 文件读取凭据（默认读取当前目录的 .env 和环境变量）
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// 同时把日志追加写入该文件
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// 只在终端打印通知，不发送到 Telegram
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let credentials = match &cli.env_file {
        Some(path) => Credentials::from_env_file(path)?,
        None => {
            dotenvy::dotenv().ok();
            Credentials::from_env()
        }
    };

    if let Err(e) = credentials.validate() {
        if let BotError::CredentialMissing(missing) = &e {
            for entry in missing {
                error!("{}", entry);
            }
        }
        return Err(e.into());
    }

    // reqwest blocking 客户端不能在异步上下文里创建或销毁，整个循环放到 blocking 线程
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let dry_run = cli.dry_run;
    let mut worker =
        tokio::task::spawn_blocking(move || run_watcher(credentials, dry_run, &shutdown_rx));

    tokio::select! {
        result = &mut worker => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Cannot listen for interrupt signal")?;
            info!("Interrupt received, homework bot is stopping");
            let _ = shutdown_tx.send(());
            match wait_for_worker(&mut worker, SHUTDOWN_GRACE, tokio::signal::ctrl_c()).await? {
                Shutdown::Finished(result) => result,
                Shutdown::GraceExpired => {
                    warn!(grace_secs = SHUTDOWN_GRACE.as_secs(), "Watcher did not stop in time, exiting");
                    std::process::exit(0);
                }
                Shutdown::Interrupted => {
                    warn!("Second interrupt received, exiting immediately");
                    std::process::exit(130);
                }
            }
        }
    }
}

fn run_watcher(credentials: Credentials, dry_run: bool, shutdown: &Receiver<()>) -> Result<()> {
    let client = PracticumClient::new(ApiConfig::with_token(credentials.practicum_token))?;

    let channel: Box<dyn NotificationChannel> = if dry_run {
        info!("Dry-run mode, notifications are printed to stdout");
        Box::new(ConsoleChannel)
    } else {
        Box::new(TelegramChannel::new(TelegramConfig::new(
            credentials.telegram_token,
            credentials.telegram_chat_id,
        ))?)
    };

    let mut watcher = HomeworkWatcher::new(client, channel, PollCursor::now());
    watcher.run(shutdown);
    Ok(())
}

/// 初始化 tracing 日志系统
///
/// 通过 RUST_LOG 环境变量控制日志级别，默认为 info。
/// 指定 `--log-file` 时额外写一份不带颜色的日志到文件。
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("homework_bot=info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(())
}
