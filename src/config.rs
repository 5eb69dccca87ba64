//! 配置 - 常量、凭据加载与凭据校验
//!
//! 凭据读取顺序：
//! 1. `--env-file` 指定的 dotenv 文件
//! 2. 进程环境变量（`main` 启动时会先加载当前目录的 `.env`）

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::BotError;

/// 作业状态 API 地址
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Telegram Bot API 地址
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// API 请求超时
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// 轮询间隔
pub const RETRY_PERIOD: Duration = Duration::from_secs(600);

/// 收到中断后等待循环退出的最长时间，需覆盖一次完整的 API 请求
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// 运行所需的三个凭据
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    /// 作业 API token
    pub practicum_token: String,
    /// Telegram bot token
    pub telegram_token: String,
    /// 接收通知的 chat id
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "<blank>"
    } else {
        "<redacted>"
    }
}

impl Credentials {
    /// 从进程环境变量读取，缺失的变量记为空字符串
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从 dotenv 文件读取，文件中没有的变量回退到进程环境
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let mut values = HashMap::new();
        let iter = dotenvy::from_path_iter(path)
            .with_context(|| format!("Cannot open env file {}", path.display()))?;
        for item in iter {
            let (key, value) =
                item.with_context(|| format!("Cannot parse env file {}", path.display()))?;
            values.insert(key, value);
        }

        Ok(Self::from_lookup(|key| {
            values
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
        }))
    }

    /// 通过任意查找函数构造
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            practicum_token: lookup(PRACTICUM_TOKEN).unwrap_or_default(),
            telegram_token: lookup(TELEGRAM_TOKEN).unwrap_or_default(),
            telegram_chat_id: lookup(TELEGRAM_CHAT_ID).unwrap_or_default(),
        }
    }

    /// 按固定顺序列出 (名称, 值)
    pub fn as_pairs(&self) -> [(&'static str, &str); 3] {
        [
            (PRACTICUM_TOKEN, self.practicum_token.as_str()),
            (TELEGRAM_TOKEN, self.telegram_token.as_str()),
            (TELEGRAM_CHAT_ID, self.telegram_chat_id.as_str()),
        ]
    }

    /// 启动时校验一次
    pub fn validate(&self) -> Result<(), BotError> {
        let missing = check_tokens(&self.as_pairs());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BotError::CredentialMissing(missing))
        }
    }
}

/// 检查凭据是否齐全
///
/// 对每个为空或只含空白的值生成一条描述，顺序与输入一致。
/// 返回空列表表示全部有效。
pub fn check_tokens(tokens: &[(&str, &str)]) -> Vec<String> {
    tokens
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| format!("{name} is a required credential but its value is empty or blank"))
        .collect()
}
