use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::log_step;
use crate::parser::models::{MediaStream, Selection, SelectionMode, VideoMeta};
use crate::parser::source::ContentSource;
use crate::parser::stream_selector;
use crate::parser::url_parser::UrlParser;
use crate::post_process::{self, merger::MediaMerger};
use error::DownloadError;
use target::{DownloadTarget, TempFiles};

pub mod core;
pub mod error;
pub mod target;

/// 一次下载请求
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub locator: String,
    pub target: PathBuf,
    pub mode: SelectionMode,
}

/// 下载结果摘要
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub title: String,
    pub target: PathBuf,
    pub selection: Selection,
    pub bytes: u64,
}

pub struct VideoDownloader<S: ContentSource> {
    source: S,
    merger: MediaMerger,
}

impl<S: ContentSource> VideoDownloader<S> {
    pub fn new(source: S, merger: MediaMerger) -> Self {
        Self { source, merger }
    }

    pub async fn save(&self, request: &DownloadRequest) -> Result<DownloadSummary, DownloadError> {
        match request.mode {
            SelectionMode::AudioAndVideo => self.save_as(&request.locator, &request.target).await,
            SelectionMode::AudioOnly => {
                self.save_audio_as(&request.locator, &request.target).await
            }
            SelectionMode::VideoOnly => {
                self.save_video_as(&request.locator, &request.target).await
            }
        }
    }

    /// 下载最佳音频和视频并合并为一个文件 (.webm / .mp4)
    pub async fn save_as(
        &self,
        locator: &str,
        target: &Path,
    ) -> Result<DownloadSummary, DownloadError> {
        self.run(locator, target, SelectionMode::AudioAndVideo).await
    }

    /// 只下载最佳音频 (.opus / .m4a / .mp3)
    pub async fn save_audio_as(
        &self,
        locator: &str,
        target: &Path,
    ) -> Result<DownloadSummary, DownloadError> {
        self.run(locator, target, SelectionMode::AudioOnly).await
    }

    /// 只下载最佳视频，不含音轨 (.webm / .mp4)
    pub async fn save_video_as(
        &self,
        locator: &str,
        target: &Path,
    ) -> Result<DownloadSummary, DownloadError> {
        self.run(locator, target, SelectionMode::VideoOnly).await
    }

    async fn run(
        &self,
        locator: &str,
        target: &Path,
        mode: SelectionMode,
    ) -> Result<DownloadSummary, DownloadError> {
        let id = UrlParser::parse(locator)?;
        let target = DownloadTarget::validate(target, mode)?;

        log_step!("解析视频信息");
        let meta = self.source.fetch(&id).await?;
        info!("标题: << {} >>", meta.title);

        let eligible = eligible_streams(&meta, &target);
        let selection = stream_selector::select(mode, &eligible)?;

        let mut temps = TempFiles::new(target.parent_dir());
        let mut bytes = 0;

        let video_path = match &selection.video {
            Some(stream) => {
                log_step!("下载视频流 ({})", stream.describe());
                let path = temps.path_for("video", target.format.video_extension());
                bytes += self.source.download(stream, &path).await?;
                Some(path)
            }
            None => None,
        };

        let audio_path = match &selection.audio {
            Some(stream) => {
                log_step!("下载音频流 ({})", stream.describe());
                let path = temps.path_for("audio", target.format.audio_extension());
                bytes += self.source.download(stream, &path).await?;
                Some(path)
            }
            None => None,
        };

        log_step!("后处理");
        post_process::post_process(
            &target,
            video_path.as_deref(),
            audio_path.as_deref(),
            &self.merger,
            &mut temps,
        )
        .await?;

        Ok(DownloadSummary {
            title: meta.title,
            target: target.path,
            selection,
            bytes,
        })
    }
}

/// 按输出格式过滤可用的流
pub fn eligible_streams(meta: &VideoMeta, target: &DownloadTarget) -> Vec<MediaStream> {
    let eligible: Vec<MediaStream> = meta
        .streams
        .iter()
        .filter(|s| target.format.accepts(s))
        .cloned()
        .collect();
    debug!(
        "共 {} 个流，其中 {} 个适用于 .{}",
        meta.streams.len(),
        eligible.len(),
        target.format.extension()
    );
    eligible
}
