use thiserror::Error;

use super::models::StreamKind;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("无效的链接: {0}")]
    InvalidLocator(String),
    #[error("没有可用的{kind}流")]
    NoStreamAvailable { kind: StreamKind },
    #[error("视频无法播放: {0}")]
    Unplayable(String),
    #[error("解析错误: {0}")]
    ParseError(String),
    #[error("API错误: {0}")]
    ApiError(String),
}

impl From<crate::common::api::error::ApiError> for ParseError {
    fn from(err: crate::common::api::error::ApiError) -> Self {
        match err {
            crate::common::api::error::ApiError::InvalidResponse(msg) => ParseError::ApiError(msg),
            crate::common::api::error::ApiError::Reqwest(e) => ParseError::ApiError(e.to_string()),
            _ => ParseError::ApiError(err.to_string()),
        }
    }
}
