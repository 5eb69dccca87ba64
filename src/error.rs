//! 错误类型 - 轮询、校验、通知各环节的封闭错误枚举

use std::fmt;

/// HTTP 响应诊断信息（404 / 非 200 时携带）
#[derive(Debug, Clone, PartialEq)]
pub struct HttpDiagnostics {
    pub url: String,
    pub status: u16,
    pub headers: String,
    pub body: String,
}

impl fmt::Display for HttpDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "URL: {}\nHeaders: {}\nBody: {}\nStatus: {}",
            self.url, self.headers, self.body, self.status
        )
    }
}

impl HttpDiagnostics {
    /// 面向用户的简要描述：只含状态码、接口地址（去掉查询参数）和响应体
    ///
    /// headers 里有 Date 等每次都变化的字段，不能进入通知文本，否则去重失效
    pub fn summary(&self) -> String {
        let endpoint = self.url.split('?').next().unwrap_or(&self.url);
        format!("status {} from {}: {}", self.status, endpoint, self.body.trim())
    }
}

/// 所有错误种类
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("required credentials are missing: {}", .0.join("; "))]
    CredentialMissing(Vec<String>),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("cannot connect to the API: {0}")]
    Connection(String),

    #[error("unexpected request failure: {0}")]
    UnexpectedRequest(String),

    #[error("endpoint not found.\n{0}")]
    EndpointNotFound(HttpDiagnostics),

    #[error("response status is not 200.\n{0}")]
    UnexpectedStatus(HttpDiagnostics),

    #[error("empty response from the API")]
    EmptyResponse,

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("failed to deliver notification: {0}")]
    NotificationDelivery(String),

    #[error("{0}")]
    Unclassified(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

/// 循环对错误的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// 只记录日志
    LogOnly,
    /// 记录日志并通知用户（响应状态异常）
    NotifyStatus,
    /// 记录日志并通知用户（通用程序故障）
    NotifyFailure,
}

impl BotError {
    /// 通知用户时使用的文本，同一故障多次出现时保持不变
    pub fn summary(&self) -> String {
        match self {
            Self::EndpointNotFound(diag) => format!("endpoint not found ({})", diag.summary()),
            Self::UnexpectedStatus(diag) => {
                format!("response status is not 200 ({})", diag.summary())
            }
            other => other.to_string(),
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Timeout(_)
            | Self::Connection(_)
            | Self::UnexpectedRequest(_)
            | Self::NotificationDelivery(_) => Recovery::LogOnly,
            Self::EndpointNotFound(_) | Self::UnexpectedStatus(_) => Recovery::NotifyStatus,
            Self::CredentialMissing(_)
            | Self::EmptyResponse
            | Self::TypeMismatch(_)
            | Self::MissingField(_)
            | Self::UnknownStatus(_)
            | Self::Unclassified(_) => Recovery::NotifyFailure,
        }
    }
}
