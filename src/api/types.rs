//! 作业 API 响应类型 - 响应校验与状态翻译

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{BotError, Result};

/// 作业审核状态（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    /// 审核通过
    Approved,
    /// 审核中
    Reviewing,
    /// 退回修改
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// 状态码
    pub fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// 面向用户的审核结论
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "The work has been reviewed: the reviewer liked everything. Hooray!",
            Self::Reviewing => "The work has been taken for review.",
            Self::Rejected => "The work has been reviewed: the reviewer has remarks.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| BotError::UnknownStatus(format!("`{s}` is not an expected review status")))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 单条作业记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub name: String,
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    /// 从原始 JSON 条目解析
    pub fn from_value(item: &Value) -> Result<Self> {
        let item = item.as_object().ok_or_else(|| {
            BotError::TypeMismatch("homework item is not an object".to_string())
        })?;

        let name = required_str(item.get("homework_name"), "homework_name")?;
        let status = required_str(item.get("status"), "status")?;

        Ok(Self {
            name: name.to_string(),
            status: status.parse()?,
        })
    }

    /// 状态变更通知文本
    pub fn message(&self) -> String {
        format!(
            "Review status of \"{}\" has changed. {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// 取非空字符串字段；缺失、null 或空串视为缺失
fn required_str<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a str> {
    match value {
        None | Some(Value::Null) => Err(missing(field)),
        Some(Value::String(s)) if s.is_empty() => Err(missing(field)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(BotError::TypeMismatch(format!(
            "homework field `{field}` is not a string: {other}"
        ))),
    }
}

fn missing(field: &str) -> BotError {
    BotError::MissingField(format!("homework item has no `{field}`"))
}

/// 翻译单条作业为通知文本
pub fn parse_status(item: &Value) -> Result<String> {
    HomeworkRecord::from_value(item).map(|record| record.message())
}

/// 校验通过的响应
#[derive(Debug, Clone, Copy)]
pub struct ValidResponse<'a> {
    pub homeworks: &'a [Value],
    /// 下一次轮询的起点；字段缺失或非整数时为 None
    pub current_date: Option<i64>,
}

/// 校验 API 响应结构
pub fn check_response(payload: &Value) -> Result<ValidResponse<'_>> {
    if is_falsy(payload) {
        return Err(BotError::EmptyResponse);
    }
    let map = payload.as_object().ok_or_else(|| {
        BotError::TypeMismatch("response is not a JSON object".to_string())
    })?;

    let homeworks = match map.get("homeworks") {
        None | Some(Value::Null) => {
            return Err(BotError::MissingField(
                "response has no `homeworks`".to_string(),
            ))
        }
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => {
            return Err(BotError::TypeMismatch(
                "`homeworks` is not a list".to_string(),
            ))
        }
    };

    Ok(ValidResponse {
        homeworks,
        current_date: map.get("current_date").and_then(Value::as_i64),
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
