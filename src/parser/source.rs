use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use super::errors::ParseError;
use super::models::{MediaStream, VideoId, VideoMeta};
use super::video_parser::parse_player_response;
use crate::common::api::models::player::{
    ClientContext, PlayerRequest, PlayerResponse, RequestContext,
};
use crate::common::client::client::TubeClient;
use crate::downloader::core::DownloadCore;
use crate::downloader::error::DownloadError;

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player?prettyPrint=false";

// 内容来源：提供流列表，并负责把单个流写入本地文件
// 其他平台可以实现这个trait
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, id: &VideoId) -> Result<VideoMeta, ParseError>;

    async fn download(&self, stream: &MediaStream, path: &Path) -> Result<u64, DownloadError>;
}

pub struct YouTubeSource {
    client: TubeClient,
    core: DownloadCore,
}

impl YouTubeSource {
    pub fn new(client: TubeClient) -> Self {
        Self {
            core: DownloadCore::new(&client),
            client,
        }
    }

    fn player_request(id: &VideoId) -> PlayerRequest {
        // VR 客户端返回的地址无需签名解密
        PlayerRequest {
            video_id: id.to_string(),
            context: RequestContext {
                client: ClientContext {
                    client_name: "ANDROID_VR",
                    client_version: "1.62.27",
                    device_make: "Oculus",
                    device_model: "Quest 3",
                    android_sdk_version: 32,
                    os_name: "Android",
                    os_version: "12L",
                    hl: "en",
                    gl: "US",
                },
            },
            content_check_ok: true,
            racy_check_ok: true,
        }
    }
}

#[async_trait]
impl ContentSource for YouTubeSource {
    async fn fetch(&self, id: &VideoId) -> Result<VideoMeta, ParseError> {
        info!("获取视频信息: {}", id.watch_url());
        let resp: PlayerResponse = self
            .client
            .post_json(PLAYER_ENDPOINT, &Self::player_request(id))
            .await?;
        parse_player_response(id, resp)
    }

    async fn download(&self, stream: &MediaStream, path: &Path) -> Result<u64, DownloadError> {
        self.core.download_stream(stream, path).await
    }
}
