use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::constants;

/// 无法解析的响应体写入 `message` 时保留的最大字符数
const MAX_RAW_MESSAGE_LENGTH: usize = 500;

/// 服务端统一响应结构
///
/// 除了响应体中的 `code`、`data`、`message`，还附带了 HTTP 状态码和原始响应头，
/// 便于调用方读取通过响应头返回的会话信息。
///
/// 除 401 外，管线不会因为响应内容报错：
///
/// - 响应体中没有 `code` 字段时 `code` 为 `None`（例如网关错误页、框架默认的错误 JSON），
///   判断成功与否时应同时检查 `status`
/// - 响应体不是 JSON 时 `data` 为 `None`，`message` 为截断后的原始文本
/// - `data` 与期望的类型不符时 `data` 为 `None`，`code` 与 `message` 照常保留
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub code: Option<i64>,
    pub data: Option<T>,
    pub message: String,
    pub status: u16,
    pub header: HeaderMap,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
}

impl<T> ApiResponse<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// HTTP 状态码为 2xx
    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 读取响应头，名称不区分大小写
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header.get(name).and_then(|v| v.to_str().ok())
    }

    /// 响应头中的会话 ID
    pub fn session_id(&self) -> Option<&str> {
        self.header(constants::SESSION_ID_HEADER)
            .filter(|v| !v.is_empty())
    }

    /// 响应头中的用户 ID
    pub fn user_id(&self) -> Option<&str> {
        self.header(constants::USER_ID_HEADER).filter(|v| !v.is_empty())
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// 由响应体构建，`body` 为已解析的 JSON，`raw` 为原始字节
    ///
    /// 解析失败时只记录警告，不会返回错误。
    pub(crate) fn from_body(body: Option<Value>, raw: &[u8], status: u16, header: HeaderMap) -> Self {
        let mut response = ApiResponse {
            code: None,
            data: None,
            message: String::new(),
            status,
            header,
        };

        let envelope = match body {
            Some(value) => serde_json::from_value::<Envelope>(value)
                .inspect_err(|e| warn!("response body is not an envelope: {}", e))
                .ok(),
            None => None,
        };

        match envelope {
            Some(envelope) => {
                response.code = envelope.code;
                response.message = envelope.message;
                response.data = envelope.data.and_then(|data| {
                    serde_json::from_value(data)
                        .inspect_err(|e| warn!("unexpected response data: {}", e))
                        .ok()
                });
            }
            None => response.message = truncate(raw),
        }

        response
    }
}

fn truncate(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim()
        .chars()
        .take(MAX_RAW_MESSAGE_LENGTH)
        .collect()
}

fn null_as_default<'de, D, V>(deserializer: D) -> std::result::Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    Ok(Option::<V>::deserialize(deserializer)?.unwrap_or_default())
}
