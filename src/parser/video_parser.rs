use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use super::errors::ParseError;
use super::models::{MediaStream, StreamKind, VideoId, VideoMeta};
use crate::common::api::models::player::{PlayerResponse, RawFormat};

lazy_static! {
    static ref MIME_PATTERN: Regex =
        Regex::new(r#"^(audio|video)/([\w-]+);\s*codecs="([^"]+)""#).unwrap();
    static ref QUALITY_LABEL_PATTERN: Regex = Regex::new(r"^(\d+)p").unwrap();
}

/// 将播放器接口响应转换为视频元数据
pub fn parse_player_response(id: &VideoId, resp: PlayerResponse) -> Result<VideoMeta, ParseError> {
    if resp.playability_status.status != "OK" {
        let reason = resp
            .playability_status
            .reason
            .unwrap_or_else(|| resp.playability_status.status.clone());
        return Err(ParseError::Unplayable(reason));
    }

    let streaming_data = resp
        .streaming_data
        .ok_or_else(|| ParseError::ParseError("响应中缺少 streamingData".to_string()))?;

    let mut streams = Vec::new();
    for (format, adaptive) in streaming_data
        .formats
        .iter()
        .map(|f| (f, false))
        .chain(streaming_data.adaptive_formats.iter().map(|f| (f, true)))
    {
        match convert_format(format, adaptive) {
            Some(stream) => {
                debug!("解析到流: {}", stream.describe());
                streams.push(stream);
            }
            None => continue,
        }
    }

    let (title, author, length_seconds) = match resp.video_details {
        Some(details) => (
            details.title,
            details.author,
            details
                .length_seconds
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        ),
        None => (id.to_string(), String::new(), 0),
    };

    Ok(VideoMeta {
        id: id.clone(),
        title,
        author,
        length_seconds,
        streams,
    })
}

fn convert_format(format: &RawFormat, adaptive: bool) -> Option<MediaStream> {
    let Some(url) = format.url.clone() else {
        if format.signature_cipher.is_some() {
            warn!("跳过需要签名解密的流: itag={}", format.itag);
        } else {
            warn!("跳过缺少下载地址的流: itag={}", format.itag);
        }
        return None;
    };

    let Some((media_type, container, codec)) = parse_mime_type(&format.mime_type) else {
        warn!("无法识别的 mimeType: {} (itag={})", format.mime_type, format.itag);
        return None;
    };

    let kind = match (adaptive, media_type.as_str()) {
        (false, _) => StreamKind::AudioVideo,
        (true, "audio") => StreamKind::Audio,
        (true, _) => StreamKind::Video,
    };

    let audio_bitrate = kind.has_audio().then_some(format.bitrate);
    let video_resolution = if kind.has_video() {
        parse_resolution(format.quality_label.as_deref(), format.height)
    } else {
        None
    };
    let video_fps = if kind.has_video() { format.fps } else { None };

    Some(MediaStream {
        itag: format.itag,
        kind,
        audio_bitrate,
        video_resolution,
        video_fps,
        container,
        codec,
        content_length: format.content_length.as_deref().and_then(|s| s.parse().ok()),
        url,
    })
}

/// 解析 `video/webm; codecs="vp9"`，返回 (类型, 容器, 首个编码)
pub fn parse_mime_type(mime: &str) -> Option<(String, String, String)> {
    let caps = MIME_PATTERN.captures(mime)?;
    let codec = caps[3].split(',').next()?.trim().to_string();
    Some((caps[1].to_string(), caps[2].to_string(), codec))
}

// 优先使用清晰度标签中的数字 ("1080p60" -> 1080)，竖屏视频的 height 并不等于清晰度
fn parse_resolution(quality_label: Option<&str>, height: Option<u32>) -> Option<u32> {
    quality_label
        .and_then(|label| QUALITY_LABEL_PATTERN.captures(label))
        .and_then(|caps| caps[1].parse().ok())
        .or(height)
}
