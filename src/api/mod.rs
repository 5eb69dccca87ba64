//! 作业审核 API - 轮询客户端、响应校验、状态翻译

pub mod client;
pub mod types;

pub use client::{classify_transport, ApiConfig, HomeworkSource, PollOutcome, PracticumClient};
pub use types::{check_response, parse_status, HomeworkRecord, HomeworkStatus, ValidResponse};
