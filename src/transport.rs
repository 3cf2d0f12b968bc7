//! HTTP 传输层
//!
//! 请求管线只负责构建请求和处理响应，真正的网络 I/O 由 [`Transport`] 实现完成。
//! 只要收到了响应（无论状态码是多少）都视为成功，只有网络层失败才返回错误。

use async_trait::async_trait;
use reqwest::{Method, header::HeaderMap};
use tracing::{debug, instrument};

use crate::Result;

/// 待发送的 HTTP 请求
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// 收到的 HTTP 响应
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输层
///
/// 实现方需要保证：收到响应时返回 `Ok`（包括 4xx/5xx），
/// 无法获得响应时（DNS、连接失败等）返回 `Err`。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// 基于 `reqwest` 的默认传输层
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义的 `reqwest::Client`，便于配置代理、TLS 等
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        debug!("response: {:#?}", response);

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
