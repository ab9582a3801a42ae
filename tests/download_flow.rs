use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use tube_downloader::downloader::error::DownloadError;
use tube_downloader::downloader::{DownloadRequest, VideoDownloader};
use tube_downloader::parser::ContentSource;
use tube_downloader::parser::errors::ParseError;
use tube_downloader::parser::models::{MediaStream, SelectionMode, StreamKind, VideoId, VideoMeta};
use tube_downloader::post_process::merger::MediaMerger;

const LOCATOR: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

// 不访问网络的内容来源，下载时把 url 写入文件
struct FakeSource {
    streams: Vec<MediaStream>,
    downloaded: Mutex<Vec<u32>>,
}

impl FakeSource {
    fn new(streams: Vec<MediaStream>) -> Self {
        Self {
            streams,
            downloaded: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn fetch(&self, id: &VideoId) -> Result<VideoMeta, ParseError> {
        Ok(VideoMeta {
            id: id.clone(),
            title: "Never Gonna Give You Up".to_string(),
            author: "Rick Astley".to_string(),
            length_seconds: 213,
            streams: self.streams.clone(),
        })
    }

    async fn download(&self, stream: &MediaStream, path: &Path) -> Result<u64, DownloadError> {
        self.downloaded.lock().unwrap().push(stream.itag);
        tokio::fs::write(path, stream.url.as_bytes()).await?;
        Ok(stream.url.len() as u64)
    }
}

fn stream(itag: u32, kind: StreamKind, container: &str, codec: &str) -> MediaStream {
    MediaStream {
        itag,
        kind,
        audio_bitrate: None,
        video_resolution: None,
        video_fps: None,
        container: container.to_string(),
        codec: codec.to_string(),
        content_length: None,
        url: format!("stream-{}", itag),
    }
}

fn audio(itag: u32, container: &str, codec: &str, bitrate: u64) -> MediaStream {
    MediaStream {
        audio_bitrate: Some(bitrate),
        ..stream(itag, StreamKind::Audio, container, codec)
    }
}

fn video(itag: u32, container: &str, codec: &str, resolution: u32, fps: u32) -> MediaStream {
    MediaStream {
        video_resolution: Some(resolution),
        video_fps: Some(fps),
        ..stream(itag, StreamKind::Video, container, codec)
    }
}

fn catalog() -> Vec<MediaStream> {
    vec![
        MediaStream {
            audio_bitrate: Some(500_000),
            video_resolution: Some(360),
            video_fps: Some(30),
            ..stream(18, StreamKind::AudioVideo, "mp4", "avc1.42001E")
        },
        video(137, "mp4", "avc1.640028", 1080, 30),
        video(248, "webm", "vp9", 1080, 30),
        video(303, "webm", "vp9", 1080, 60),
        video(302, "webm", "vp9", 720, 60),
        audio(140, "mp4", "mp4a.40.2", 130_000),
        audio(249, "webm", "opus", 50_000),
        audio(251, "webm", "opus", 135_000),
        audio(250, "webm", "opus", 70_000),
    ]
}

fn downloader(source: FakeSource) -> VideoDownloader<FakeSource> {
    VideoDownloader::new(source, MediaMerger::with_command("definitely-not-an-ffmpeg-binary"))
}

fn leftover_temp_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".tmp_"))
        .collect()
}

#[tokio::test]
async fn test_save_audio_as_opus() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("song.opus");
    let dl = downloader(FakeSource::new(catalog()));

    let summary = dl.save_audio_as(LOCATOR, &target).await.unwrap();

    assert_eq!(summary.selection.audio.as_ref().map(|s| s.itag), Some(251));
    assert!(summary.selection.video.is_none());
    assert_eq!(summary.title, "Never Gonna Give You Up");
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "stream-251");
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_save_audio_as_m4a_uses_aac() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("song.m4a");
    let dl = downloader(FakeSource::new(catalog()));

    let request = DownloadRequest {
        locator: "dQw4w9WgXcQ".to_string(),
        target: target.clone(),
        mode: SelectionMode::AudioOnly,
    };
    let summary = dl.save(&request).await.unwrap();

    assert_eq!(summary.selection.audio.map(|s| s.itag), Some(140));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "stream-140");
}

#[tokio::test]
async fn test_save_video_as_webm() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("clip.webm");
    let source = FakeSource::new(catalog());
    let dl = downloader(source);

    let summary = dl.save_video_as(LOCATOR, &target).await.unwrap();

    let selected = summary.selection.video.unwrap();
    assert_eq!(selected.itag, 303);
    assert_eq!(summary.bytes, "stream-303".len() as u64);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "stream-303");
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_audio_only_without_audio_streams() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("song.opus");
    let streams = vec![video(303, "webm", "vp9", 1080, 60)];
    let dl = downloader(FakeSource::new(streams));

    let result = dl.save_audio_as(LOCATOR, &target).await;

    assert!(matches!(
        result,
        Err(DownloadError::Source(ParseError::NoStreamAvailable {
            kind: StreamKind::Audio
        }))
    ));
    assert!(!target.exists());
}

#[tokio::test]
async fn test_invalid_locator() {
    let dir = tempfile::tempdir().unwrap();
    let dl = downloader(FakeSource::new(catalog()));

    let result = dl
        .save_audio_as("https://example.com/video", &dir.path().join("a.opus"))
        .await;

    assert!(matches!(
        result,
        Err(DownloadError::Source(ParseError::InvalidLocator(_)))
    ));
}

#[tokio::test]
async fn test_existing_target_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("song.opus");
    std::fs::write(&target, b"keep me").unwrap();
    let source = FakeSource::new(catalog());
    let dl = downloader(source);

    let result = dl.save_audio_as(LOCATOR, &target).await;

    assert!(matches!(result, Err(DownloadError::TargetExists(_))));
    assert_eq!(std::fs::read(&target).unwrap(), b"keep me");
}

#[tokio::test]
async fn test_merge_failure_cleans_up_temporaries() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("video.webm");
    let dl = downloader(FakeSource::new(catalog()));

    // ffmpeg 不存在，合并失败
    let result = dl.save_as(LOCATOR, &target).await;

    assert!(matches!(result, Err(DownloadError::FfmpegNotFound)));
    assert!(!target.exists());
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_invalid_locator_reported_before_target_check() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("song.opus");
    std::fs::write(&target, b"x").unwrap();
    let dl = downloader(FakeSource::new(catalog()));

    let result = dl.save_audio_as("not a locator", &target).await;

    assert!(matches!(
        result,
        Err(DownloadError::Source(ParseError::InvalidLocator(_)))
    ));
}

// 假的 ffmpeg：把参数写入最后一个参数指向的文件，然后以 exit_code 退出
#[cfg(unix)]
fn fake_ffmpeg(dir: &Path, exit_code: i32) -> MediaMerger {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join(format!("ffmpeg-{}.sh", exit_code));
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\n\
             [ \"$1\" = \"-version\" ] && exit 0\n\
             for last; do :; done\n\
             echo \"$*\" > \"$last\"\n\
             exit {}\n",
            exit_code
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    MediaMerger::with_command(script.to_string_lossy().into_owned())
}

#[cfg(unix)]
#[tokio::test]
async fn test_save_as_webm_merges_vp9_and_opus() {
    let bin = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("video.webm");
    let dl = VideoDownloader::new(FakeSource::new(catalog()), fake_ffmpeg(bin.path(), 0));

    let summary = dl.save_as(LOCATOR, &target).await.unwrap();

    assert_eq!(summary.selection.video.map(|s| s.itag), Some(303));
    assert_eq!(summary.selection.audio.map(|s| s.itag), Some(251));
    let args = std::fs::read_to_string(&target).unwrap();
    assert!(args.contains("-c copy"), "ffmpeg 参数: {}", args);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_save_as_mp4_merges_avc_and_aac() {
    let bin = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("video.mp4");
    let dl = VideoDownloader::new(FakeSource::new(catalog()), fake_ffmpeg(bin.path(), 0));

    let summary = dl.save_as(LOCATOR, &target).await.unwrap();

    assert_eq!(summary.selection.video.map(|s| s.itag), Some(137));
    assert_eq!(summary.selection.audio.map(|s| s.itag), Some(140));
    assert!(target.exists());
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_save_audio_as_mp3_transcodes_opus() {
    let bin = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("song.mp3");
    let dl = VideoDownloader::new(FakeSource::new(catalog()), fake_ffmpeg(bin.path(), 0));

    let summary = dl.save_audio_as(LOCATOR, &target).await.unwrap();

    assert_eq!(summary.selection.audio.map(|s| s.itag), Some(251));
    let args = std::fs::read_to_string(&target).unwrap();
    assert!(args.contains("libmp3lame"), "ffmpeg 参数: {}", args);
    assert!(leftover_temp_files(dir.path()).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_transcode_leaves_no_partial_target() {
    let bin = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("song.mp3");

    // ffmpeg 写出部分文件后失败
    let failing = VideoDownloader::new(FakeSource::new(catalog()), fake_ffmpeg(bin.path(), 1));
    let result = failing.save_audio_as(LOCATOR, &target).await;
    assert!(matches!(result, Err(DownloadError::FfmpegError(_))));
    assert!(!target.exists());
    assert!(leftover_temp_files(dir.path()).is_empty());

    // 重新执行不会因为残留文件报 TargetExists
    let working = VideoDownloader::new(FakeSource::new(catalog()), fake_ffmpeg(bin.path(), 0));
    working.save_audio_as(LOCATOR, &target).await.unwrap();
    assert!(target.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_merge_leaves_no_partial_target() {
    let bin = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("video.webm");
    let dl = VideoDownloader::new(FakeSource::new(catalog()), fake_ffmpeg(bin.path(), 1));

    let result = dl.save_as(LOCATOR, &target).await;

    assert!(matches!(result, Err(DownloadError::FfmpegError(_))));
    assert!(!target.exists());
    assert!(leftover_temp_files(dir.path()).is_empty());
}
