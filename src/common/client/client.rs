use std::time::Duration;

use crate::common::api::error::ApiError;
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, RANGE, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use tracing::{debug, error};

pub const USER_AGENT_VALUE: &str = "com.google.android.apps.youtube.vr.oculus/1.62.27 (Linux; U; Android 12L; eureka-user Build/SQ3A.220605.009.A1) gzip";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// 共享连接池的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct TubeClient {
    pub inner: Client,
}

impl TubeClient {
    pub fn new() -> Result<Self, ApiError> {
        let inner = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .default_headers(Self::get_default_headers())
            .build()
            .map_err(|e| {
                error!("创建 HTTP 客户端失败: {}", e);
                ApiError::Reqwest(e)
            })?;

        Ok(Self { inner })
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.youtube.com"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    // 以 JSON 发送请求体并解析 JSON 响应
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .inner
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("请求失败: {}", e);
                ApiError::InvalidResponse(format!("请求失败: {}", e))
            })?;

        debug!("Response Head: {:?}", resp);
        Self::handle_response::<T>(resp).await
    }

    // 获取原始响应，可选字节范围
    pub async fn get_raw_response(
        &self,
        url: &str,
        range: Option<(u64, u64)>,
    ) -> Result<Response, ApiError> {
        let mut request = self.inner.get(url);
        if let Some((start, end)) = range {
            request = request.header(RANGE, format!("bytes={}-{}", start, end));
        }
        Ok(request.send().await?)
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        if status.is_server_error() {
            return Err(ApiError::RetryLater);
        }
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let url = resp.url().to_string();
        let text = resp.text().await?;
        let json_value: Value = serde_json::from_str(&text)?;

        serde_json::from_value::<T>(json_value).map_err(|e| {
            error!("失败的请求的URL: {}", url);
            error!("JSON 结构匹配失败: {}", e);
            error!("期望的结构 可能是: {}", std::any::type_name::<T>());
            ApiError::InvalidResponse(format!("结构匹配失败: {}", e))
        })
    }
}
