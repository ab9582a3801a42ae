use std::path::Path;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::DownloadError;
use crate::common::client::client::TubeClient;
use crate::parser::models::MediaStream;

// 平台会对不带 Range 的大文件请求限速，按块请求
pub const CHUNK_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct DownloadCore {
    download_client: TubeClient,
}

impl DownloadCore {
    pub fn new(download_client: &TubeClient) -> Self {
        Self {
            download_client: download_client.clone(),
        }
    }

    /// 将流写入 output_path，返回写入的字节数
    pub async fn download_stream(
        &self,
        stream: &MediaStream,
        output_path: &Path,
    ) -> Result<u64, DownloadError> {
        debug!("开始下载流: {} -> {:?}", stream.describe(), output_path);

        let mut file = tokio::fs::File::create(output_path).await?;

        let downloaded = match stream.content_length {
            Some(total) if total > 0 => {
                let pb = Self::progress_bar(total);
                let mut downloaded = 0u64;
                for range in chunk_ranges(total, CHUNK_SIZE) {
                    let result = self
                        .download_range(&stream.url, Some(range), &mut file, &pb, downloaded)
                        .await;
                    match result {
                        Ok(written) => downloaded += written,
                        Err(e) => {
                            pb.abandon_with_message("下载失败");
                            return Err(e);
                        }
                    }
                }
                pb.finish_with_message("下载完成");
                downloaded
            }
            _ => {
                debug!("流大小未知，使用单次请求下载");
                let pb = ProgressBar::new_spinner();
                let result = self
                    .download_range(&stream.url, None, &mut file, &pb, 0)
                    .await;
                match result {
                    Ok(written) => {
                        pb.finish_with_message("下载完成");
                        written
                    }
                    Err(e) => {
                        pb.abandon_with_message("下载失败");
                        return Err(e);
                    }
                }
            }
        };

        file.flush().await?;
        debug!("下载完成: {:?}, {} 字节", output_path, downloaded);
        Ok(downloaded)
    }

    async fn download_range(
        &self,
        url: &str,
        range: Option<(u64, u64)>,
        file: &mut tokio::fs::File,
        pb: &ProgressBar,
        offset: u64,
    ) -> Result<u64, DownloadError> {
        let response = self
            .download_client
            .get_raw_response(url, range)
            .await
            .map_err(|e| DownloadError::InvalidState(e.to_string()))?;

        check_response_status(response.status(), url)?;

        let mut body = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            pb.set_position(offset + written);
        }

        if let Some((start, end)) = range {
            let expected = end - start + 1;
            if written != expected {
                return Err(DownloadError::InvalidState(format!(
                    "数据块长度不符: 期望 {} 字节，实际 {} 字节",
                    expected, written
                )));
            }
        }

        Ok(written)
    }

    fn progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// 将 [0, total) 切分为闭区间字节范围
pub fn chunk_ranges(total: u64, chunk_size: u64) -> Vec<(u64, u64)> {
    (0..total)
        .step_by(chunk_size as usize)
        .map(|start| (start, (start + chunk_size).min(total) - 1))
        .collect()
}

// 检查响应状态并处理特殊情况
fn check_response_status(status: reqwest::StatusCode, url: &str) -> Result<(), DownloadError> {
    debug!("Response Status: {}", status);

    match status {
        reqwest::StatusCode::FORBIDDEN => {
            warn!("🚫 检测到 403 Forbidden 状态码，下载地址可能已过期");
            Err(DownloadError::RateLimited(format!(
                "访问被拒绝 (403 Forbidden)，URL: {}",
                url
            )))
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => {
            warn!("⚠️ 检测到 429 Too Many Requests 状态码，请求过于频繁");
            Err(DownloadError::RateLimited(format!(
                "请求过于频繁 (429 Too Many Requests)，URL: {}",
                url
            )))
        }
        status if status.is_success() => Ok(()),
        _ => {
            warn!("❌ 非成功状态码: {}", status);
            Err(DownloadError::InvalidState(format!(
                "HTTP 请求失败，状态码: {}，URL: {}",
                status, url
            )))
        }
    }
}
