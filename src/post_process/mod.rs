pub mod merger;

use std::path::Path;

use tracing::debug;

use crate::downloader::error::DownloadError;
use crate::downloader::target::{DownloadTarget, TempFiles};
use merger::MediaMerger;

/// 将下载好的临时文件处理为最终输出
///
/// ffmpeg 先写入临时文件，成功后才移动到目标路径，失败时目标路径保持不存在
pub async fn post_process(
    target: &DownloadTarget,
    video: Option<&Path>,
    audio: Option<&Path>,
    merger: &MediaMerger,
    temps: &mut TempFiles,
) -> Result<(), DownloadError> {
    match (video, audio) {
        (Some(video), Some(audio)) => {
            debug!("执行音视频合并");
            let output = temps.path_for("output", target.format.extension());
            merger.merge_av(video, audio, &output).await?;
            move_to_target(&output, target).await
        }
        (None, Some(audio)) if target.format.needs_transcode() => {
            debug!("执行音频转码");
            let output = temps.path_for("output", target.format.extension());
            merger.transcode_audio(audio, &output).await?;
            move_to_target(&output, target).await
        }
        (Some(single), None) | (None, Some(single)) => move_to_target(single, target).await,
        (None, None) => Err(DownloadError::InvalidState(
            "没有可供后处理的文件".to_string(),
        )),
    }
}

async fn move_to_target(source: &Path, target: &DownloadTarget) -> Result<(), DownloadError> {
    debug!("移动文件: {:?} -> {:?}", source, target.path);
    tokio::fs::rename(source, &target.path).await?;
    Ok(())
}
