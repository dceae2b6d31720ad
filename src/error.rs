//! Error Types
//!
//! Every failure a handler can hit. None of them end the session:
//! callers turn them into a toast or an inline field message.

use std::fmt;

use thiserror::Error;

pub type FarmResult<T> = Result<T, FarmError>;

/// A single invalid form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Error)]
pub enum FarmError {
    /// No backend client could be built (missing URL or key)
    #[error("Supabase 客户端未初始化")]
    GatewayUnavailable,

    /// The backend answered with an error status
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The request never got an answer
    #[error("网络错误: {0}")]
    Transport(String),

    /// The answer did not have the expected shape
    #[error("响应解析失败: {0}")]
    Decode(String),

    /// Rejected before any remote call
    #[error("表单校验失败")]
    Validation(Vec<FieldError>),

    #[error("本地存储不可用: {0}")]
    Storage(String),
}

impl FarmError {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        FarmError::Remote {
            status,
            message: message.into(),
        }
    }

    /// Field errors, empty for every other kind
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            FarmError::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Message for `field`, if validation flagged it
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.field_errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl From<reqwest::Error> for FarmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FarmError::Decode(e.to_string())
        } else {
            FarmError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FarmError {
    fn from(e: serde_json::Error) -> Self {
        FarmError::Decode(e.to_string())
    }
}
