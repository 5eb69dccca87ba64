//! 作业状态 API 客户端

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::{ENDPOINT, REQUEST_TIMEOUT};
use crate::error::{BotError, HttpDiagnostics, Result};

/// 一次轮询的结果
pub type PollOutcome = Result<Value>;

/// 作业状态数据源
pub trait HomeworkSource: Send {
    /// 拉取 `from_date` 之后的状态变化
    fn poll(&self, from_date: i64) -> PollOutcome;
}

impl<T: HomeworkSource + ?Sized> HomeworkSource for Box<T> {
    fn poll(&self, from_date: i64) -> PollOutcome {
        (**self).poll(from_date)
    }
}

/// API 客户端配置
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// 接口地址
    pub endpoint: String,
    /// OAuth token
    pub token: String,
    /// 请求超时
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            token: String::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }
}

/// 作业状态 API 客户端（阻塞）
pub struct PracticumClient {
    client: reqwest::blocking::Client,
    config: ApiConfig,
}

impl PracticumClient {
    /// 创建新客户端
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BotError::Unclassified(format!("Cannot create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl HomeworkSource for PracticumClient {
    fn poll(&self, from_date: i64) -> PollOutcome {
        debug!(
            endpoint = %self.config.endpoint,
            from_date,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "Requesting homework statuses"
        );

        let start = Instant::now();
        let response = self
            .client
            .get(&self.config.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.config.token))
            .query(&[("from_date", from_date)])
            .send()
            .map_err(classify_transport)?;

        let status = response.status();
        debug!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "API request completed"
        );

        if status != StatusCode::OK {
            let diagnostics = HttpDiagnostics {
                url: response.url().to_string(),
                status: status.as_u16(),
                headers: format!("{:?}", response.headers()),
                body: response.text().unwrap_or_default(),
            };
            return Err(if status == StatusCode::NOT_FOUND {
                BotError::EndpointNotFound(diagnostics)
            } else {
                BotError::UnexpectedStatus(diagnostics)
            });
        }

        let body = response.text().map_err(classify_transport)?;
        serde_json::from_str(&body).map_err(|e| {
            BotError::Unclassified(format!("Response is not valid JSON: {} - body: {}", e, body))
        })
    }
}

/// 传输层错误分类
pub fn classify_transport(error: reqwest::Error) -> BotError {
    if error.is_timeout() {
        BotError::Timeout(error.to_string())
    } else if error.is_connect() {
        BotError::Connection(error.to_string())
    } else {
        BotError::UnexpectedRequest(error.to_string())
    }
}
