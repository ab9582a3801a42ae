use clap::{ArgAction, Parser};
use std::path::PathBuf;

const LONG_ABOUT: &str = "\
一个简单的YouTube视频下载工具，下载最高质量的音频和/或视频流并保存为单个文件。
需要系统中安装 ffmpeg（或通过环境变量 FFMPEG_PATH 指定路径）。

支持的输出格式:
  .webm  VP9 视频 + Opus 音频 (默认模式 / --video-only)
  .mp4   H.264 视频 + AAC 音频 (默认模式 / --video-only)
  .opus  Opus 音频 (--audio-only)
  .m4a   AAC 音频 (--audio-only)
  .mp3   Opus 音频转码为 MP3 (--audio-only)

处理 4K 60 FPS 等高质量视频时可能需要较长时间。";

/// YouTube视频下载器
#[derive(Parser, Debug)]
#[command(name = "tubedl")]
#[command(version)]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "一个简单的YouTube视频下载工具", long_about = LONG_ABOUT)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// 视频链接 (也支持 11 位视频 ID)
    #[arg(value_name = "URL")]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub url: String,

    /// 保存的目标文件，扩展名决定输出格式
    #[arg(value_name = "TARGET")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub target: PathBuf,

    /// 只下载音频
    #[arg(short = 'a', long = "audio-only", conflicts_with = "video_only")]
    pub audio_only: bool,

    /// 只下载视频（不含音轨）
    #[arg(long = "video-only")]
    pub video_only: bool,

    /// 输出调试日志
    #[arg(long)]
    pub verbose: bool,

    /// 显示版本号
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}
