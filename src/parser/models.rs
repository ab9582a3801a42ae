use std::fmt;

/// YouTube 视频 ID (11 位)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 流类型：自适应流只含音频或视频，渐进式流同时包含两者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Video,
    AudioVideo,
}

impl StreamKind {
    pub fn has_audio(self) -> bool {
        matches!(self, Self::Audio | Self::AudioVideo)
    }

    pub fn has_video(self) -> bool {
        matches!(self, Self::Video | Self::AudioVideo)
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "音频"),
            Self::Video => write!(f, "视频"),
            Self::AudioVideo => write!(f, "音视频"),
        }
    }
}

/// 单个可下载的媒体流
#[derive(Debug, Clone, PartialEq)]
pub struct MediaStream {
    pub itag: u32,
    pub kind: StreamKind,
    pub audio_bitrate: Option<u64>,
    pub video_resolution: Option<u32>,
    pub video_fps: Option<u32>,
    pub container: String, // webm / mp4
    pub codec: String,     // opus / vp9 / avc1.640028 ...
    pub content_length: Option<u64>,
    pub url: String,
}

impl MediaStream {
    /// 简短描述，用于日志输出
    pub fn describe(&self) -> String {
        match self.kind {
            StreamKind::Audio => format!(
                "itag={} {}/{} {}kbps",
                self.itag,
                self.container,
                self.codec,
                self.audio_bitrate.unwrap_or(0) / 1000
            ),
            StreamKind::Video | StreamKind::AudioVideo => format!(
                "itag={} {}/{} {}p{}",
                self.itag,
                self.container,
                self.codec,
                self.video_resolution.unwrap_or(0),
                self.video_fps.unwrap_or(0)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    AudioOnly,
    AudioAndVideo,
    VideoOnly,
}

impl SelectionMode {
    pub fn from_flags(audio_only: bool, video_only: bool) -> Self {
        match (audio_only, video_only) {
            (true, _) => Self::AudioOnly,
            (false, true) => Self::VideoOnly,
            (false, false) => Self::AudioAndVideo,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub audio: Option<MediaStream>,
    pub video: Option<MediaStream>,
}

/// 解析后的视频元数据
#[derive(Debug, Clone)]
pub struct VideoMeta {
    pub id: VideoId,
    pub title: String,
    pub author: String,
    pub length_seconds: u64,
    pub streams: Vec<MediaStream>,
}
