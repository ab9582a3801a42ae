use clap::Parser;
use colored::*;
use tracing::{debug, info};

use tube_downloader::{
    Result, cli,
    common::client::client::TubeClient,
    downloader::{DownloadRequest, VideoDownloader},
    log_error, log_info, log_success,
    common::logger::PrettyLogger,
    parser::{YouTubeSource, models::SelectionMode},
    post_process::merger::MediaMerger,
};

async fn run(args: cli::Cli) -> Result<()> {
    let request = DownloadRequest {
        locator: args.url.clone(),
        target: args.target.clone(),
        mode: SelectionMode::from_flags(args.audio_only, args.video_only),
    };
    debug!("下载请求: {:?}", request);

    let client = TubeClient::new()?;
    let downloader = VideoDownloader::new(YouTubeSource::new(client), MediaMerger::from_env());

    let summary = downloader.save(&request).await?;

    let quality = [&summary.selection.video, &summary.selection.audio]
        .into_iter()
        .flatten()
        .map(|s| s.describe())
        .collect::<Vec<_>>()
        .join(" + ");
    PrettyLogger::video_info(&summary.title, quality);
    PrettyLogger::file_info("保存到", summary.target.display().to_string());
    log_info!("共下载 {:.1} MiB", summary.bytes as f64 / 1024.0 / 1024.0);
    Ok(())
}

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let args = cli::Cli::parse();

    // 初始化日志
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("开始下载视频: {}", args.url);

    match run(args).await {
        Ok(()) => log_success!("{}", "下载完成！".green()),
        Err(e) => {
            log_error!("下载失败: {:#}", e);
            std::process::exit(1);
        }
    }
}
