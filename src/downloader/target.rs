use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

use super::error::DownloadError;
use crate::parser::models::{MediaStream, SelectionMode, StreamKind};

/// 输出文件格式，由目标文件扩展名决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Webm,
    Mp4,
    Opus,
    M4a,
    Mp3,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "webm" => Some(Self::Webm),
            "mp4" => Some(Self::Mp4),
            "opus" => Some(Self::Opus),
            "m4a" => Some(Self::M4a),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Opus => "opus",
            Self::M4a => "m4a",
            Self::Mp3 => "mp3",
        }
    }

    /// 各模式可用的输出格式
    pub fn allowed_for(mode: SelectionMode) -> &'static [OutputFormat] {
        match mode {
            SelectionMode::AudioOnly => &[Self::Opus, Self::M4a, Self::Mp3],
            SelectionMode::AudioAndVideo | SelectionMode::VideoOnly => &[Self::Webm, Self::Mp4],
        }
    }

    /// 流的容器和编码是否适合写入该格式
    pub fn accepts(self, stream: &MediaStream) -> bool {
        match stream.kind {
            StreamKind::Audio => match self {
                Self::Webm | Self::Opus | Self::Mp3 => {
                    stream.container == "webm" && stream.codec == "opus"
                }
                Self::Mp4 | Self::M4a => {
                    stream.container == "mp4" && stream.codec.starts_with("mp4a")
                }
            },
            StreamKind::Video => match self {
                Self::Webm => {
                    stream.container == "webm"
                        && (stream.codec == "vp9" || stream.codec.starts_with("vp09"))
                }
                Self::Mp4 => stream.container == "mp4" && stream.codec.starts_with("avc1"),
                Self::Opus | Self::M4a | Self::Mp3 => false,
            },
            // 只使用自适应流，渐进式流最高只有 360p
            StreamKind::AudioVideo => false,
        }
    }

    /// 音频下载时的临时文件扩展名
    pub fn audio_extension(self) -> &'static str {
        match self {
            Self::Webm | Self::Opus | Self::Mp3 => "opus",
            Self::Mp4 | Self::M4a => "m4a",
        }
    }

    /// 视频下载时的临时文件扩展名
    pub fn video_extension(self) -> &'static str {
        match self {
            Self::Mp4 | Self::M4a => "mp4",
            _ => "webm",
        }
    }

    pub fn needs_transcode(self) -> bool {
        self == Self::Mp3
    }
}

/// 经过校验的目标文件
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl DownloadTarget {
    pub fn validate(path: &Path, mode: SelectionMode) -> Result<Self, DownloadError> {
        let parent = match path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => return Err(DownloadError::ParentMissing(path.to_path_buf())),
        };
        if !parent.is_dir() {
            return Err(DownloadError::ParentMissing(parent.to_path_buf()));
        }

        if path.exists() {
            return Err(DownloadError::TargetExists(path.to_path_buf()));
        }

        let allowed = OutputFormat::allowed_for(mode);
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(OutputFormat::from_extension)
            .filter(|f| allowed.contains(f))
            .ok_or_else(|| DownloadError::UnsupportedExtension {
                path: path.to_path_buf(),
                expected: allowed
                    .iter()
                    .map(|f| format!(".{}", f.extension()))
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        debug!("目标文件校验通过: {:?} ({:?})", path, format);
        Ok(Self {
            path: path.to_path_buf(),
            format,
        })
    }

    pub fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// 临时文件，离开作用域时删除
pub struct TempFiles {
    dir: PathBuf,
    timestamp: String,
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            timestamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
            paths: Vec::new(),
        }
    }

    /// 登记一个临时文件路径，如 `.tmp_audio_20240101_120000.opus`
    pub fn path_for(&mut self, label: &str, ext: &str) -> PathBuf {
        let path = self
            .dir
            .join(format!(".tmp_{}_{}.{}", label, self.timestamp, ext));
        self.paths.push(path.clone());
        path
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("删除临时文件失败: {:?}, {}", path, e);
                } else {
                    debug!("已删除临时文件: {:?}", path);
                }
            }
        }
    }
}
