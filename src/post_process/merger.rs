use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::downloader::error::DownloadError;

pub struct MediaMerger {
    ffmpeg_cmd: String,
}

impl MediaMerger {
    // 获取 ffmpeg 路径（支持环境变量 FFMPEG_PATH）
    pub fn from_env() -> Self {
        Self {
            ffmpeg_cmd: std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
        }
    }

    pub fn with_command(ffmpeg_cmd: impl Into<String>) -> Self {
        Self {
            ffmpeg_cmd: ffmpeg_cmd.into(),
        }
    }

    /// 合并视频与音频，不重新编码
    pub async fn merge_av(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<(), DownloadError> {
        Self::ensure_exists(video_path)?;
        debug!("✅ 视频文件存在: {:?}", video_path);
        Self::ensure_exists(audio_path)?;
        debug!("✅ 音频文件存在: {:?}", audio_path);

        debug!("开始合并视频和音频 -> 输出路径: {:?}", output_path);
        self.run(merge_args(video_path, audio_path, output_path))
            .await?;

        info!("✅ 视频与音频合并成功，输出文件: {:?}", output_path);
        Ok(())
    }

    /// 将音频转码为 MP3
    pub async fn transcode_audio(
        &self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), DownloadError> {
        Self::ensure_exists(input_path)?;

        debug!("开始转码音频: {:?} -> {:?}", input_path, output_path);
        self.run(transcode_args(input_path, output_path)).await?;

        info!("✅ 音频转码成功，输出文件: {:?}", output_path);
        Ok(())
    }

    fn ensure_exists(path: &Path) -> Result<(), DownloadError> {
        if path.exists() {
            Ok(())
        } else {
            Err(DownloadError::FileNotFound(path.to_path_buf()))
        }
    }

    async fn check_available(&self) -> Result<(), DownloadError> {
        debug!("检查系统中是否安装了 ffmpeg...");
        let status = Command::new(&self.ffmpeg_cmd)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(s) if s.success() => Ok(()),
            _ => {
                error!("❌ 未检测到 ffmpeg，请确保系统中已安装并配置了 ffmpeg 可执行路径。");
                error!("安装方法参考：https://ffmpeg.org/download.html");
                error!("或者设置环境变量 FFMPEG_PATH 指向 ffmpeg 可执行文件路径");
                Err(DownloadError::FfmpegNotFound)
            }
        }
    }

    async fn run(&self, args: Vec<OsString>) -> Result<(), DownloadError> {
        self.check_available().await?;

        debug!("执行: {} {:?}", self.ffmpeg_cmd, args);
        let output = Command::new(&self.ffmpeg_cmd)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let err_msg = String::from_utf8_lossy(&output.stderr);
            error!("❌ ffmpeg 执行失败，错误日志如下：\n{}", err_msg);
            return Err(DownloadError::FfmpegError(err_msg.to_string()));
        }
        Ok(())
    }
}

pub fn merge_args(video_path: &Path, audio_path: &Path, output_path: &Path) -> Vec<OsString> {
    vec![
        "-hide_banner".into(),
        "-i".into(),
        video_path.into(),
        "-i".into(),
        audio_path.into(),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c".into(),
        "copy".into(),
        "-y".into(),
        output_path.into(),
    ]
}

pub fn transcode_args(input_path: &Path, output_path: &Path) -> Vec<OsString> {
    vec![
        "-hide_banner".into(),
        "-i".into(),
        input_path.into(),
        "-vn".into(),
        "-c:a".into(),
        "libmp3lame".into(),
        "-q:a".into(),
        "0".into(),
        "-y".into(),
        output_path.into(),
    ]
}
