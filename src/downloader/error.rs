use std::path::PathBuf;

use thiserror::Error;

use crate::parser::errors::ParseError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP错误: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("IO错误: {0}")]
    IoFailure(#[from] std::io::Error),
    #[error("{0}")]
    Source(#[from] ParseError),
    #[error("访问受限: {0}")]
    RateLimited(String),
    #[error("无效的状态: {0}")]
    InvalidState(String),
    #[error("目标文件的上级目录不存在: {0:?}")]
    ParentMissing(PathBuf),
    #[error("目标文件已存在: {0:?}")]
    TargetExists(PathBuf),
    #[error("不支持的文件扩展名: {path:?}，可选: {expected}")]
    UnsupportedExtension { path: PathBuf, expected: String },
    #[error("文件未找到: {0:?}")]
    FileNotFound(PathBuf),
    #[error("未检测到 ffmpeg")]
    FfmpegNotFound,
    #[error("ffmpeg 执行失败: {0}")]
    FfmpegError(String),
}
