use tracing::debug;

use super::errors::ParseError;
use super::models::{MediaStream, Selection, SelectionMode, StreamKind};

/// 选择码率最高的音频流，码率相同时取最先出现的那个
pub fn select_audio(streams: &[MediaStream]) -> Result<MediaStream, ParseError> {
    debug!("可用的音频流数量: {}", streams.len());
    for (i, stream) in streams.iter().enumerate() {
        debug!("音频流 {}: {}", i, stream.describe());
    }

    let selected = streams
        .iter()
        .fold(None::<&MediaStream>, |best, candidate| match best {
            Some(b) if candidate.audio_bitrate <= b.audio_bitrate => Some(b),
            _ => Some(candidate),
        })
        .ok_or(ParseError::NoStreamAvailable {
            kind: StreamKind::Audio,
        })?;

    debug!("选择最高质量音频流: {}", selected.describe());
    Ok(selected.clone())
}

/// 按 (分辨率, 帧率) 字典序选择最佳视频流，完全相同时取最先出现的那个
pub fn select_video(streams: &[MediaStream]) -> Result<MediaStream, ParseError> {
    debug!("可用的视频流数量: {}", streams.len());
    for (i, stream) in streams.iter().enumerate() {
        debug!("视频流 {}: {}", i, stream.describe());
    }

    let rank = |s: &MediaStream| (s.video_resolution, s.video_fps);
    let selected = streams
        .iter()
        .fold(None::<&MediaStream>, |best, candidate| match best {
            Some(b) if rank(candidate) <= rank(b) => Some(b),
            _ => Some(candidate),
        })
        .ok_or(ParseError::NoStreamAvailable {
            kind: StreamKind::Video,
        })?;

    debug!("选择最高质量视频流: {}", selected.describe());
    Ok(selected.clone())
}

/// 根据模式从流列表中挑选音频和/或视频
pub fn select(mode: SelectionMode, streams: &[MediaStream]) -> Result<Selection, ParseError> {
    let audio_candidates: Vec<MediaStream> = streams
        .iter()
        .filter(|s| s.kind.has_audio())
        .cloned()
        .collect();
    let video_candidates: Vec<MediaStream> = streams
        .iter()
        .filter(|s| s.kind.has_video())
        .cloned()
        .collect();

    match mode {
        SelectionMode::AudioOnly => Ok(Selection {
            audio: Some(select_audio(&audio_candidates)?),
            video: None,
        }),
        SelectionMode::VideoOnly => Ok(Selection {
            audio: None,
            video: Some(select_video(&video_candidates)?),
        }),
        SelectionMode::AudioAndVideo => Ok(Selection {
            audio: Some(select_audio(&audio_candidates)?),
            video: Some(select_video(&video_candidates)?),
        }),
    }
}
