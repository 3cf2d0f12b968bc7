//! 出站请求构建
//!
//! GET 请求的参数拼接为查询字符串，其余请求的参数作为 JSON 请求体。

use reqwest::{
    Method,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::{Map, Value};

use crate::{Result, constants, error::Error, transport::HttpRequest};

/// 一次调用对应的出站请求
#[derive(Debug, Clone)]
pub(crate) struct Outbound {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
    pub content_type: &'static str,
    pub is_auth_flow: bool,
}

impl Outbound {
    /// GET 请求，参数拼接到路径上
    pub fn get(path: &str, params: Value) -> Result<Self> {
        Ok(Self {
            method: Method::GET,
            path: append_query(path, &params)?,
            payload: None,
            content_type: constants::JSON_CONTENT_TYPE,
            is_auth_flow: false,
        })
    }

    /// 携带 JSON 请求体的请求，`null` 表示没有请求体
    pub fn with_body(method: Method, path: &str, body: Value, is_auth_flow: bool) -> Self {
        Self {
            method,
            path: path.to_string(),
            payload: (!body.is_null()).then_some(body),
            content_type: constants::JSON_CONTENT_TYPE,
            is_auth_flow,
        }
    }

    /// 合并凭证请求头，生成最终发送给传输层的请求
    pub fn into_http(self, base_url: &str, credential_headers: HeaderMap) -> Result<HttpRequest> {
        let mut headers = credential_headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));

        let body = self
            .payload
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()?;

        Ok(HttpRequest {
            method: self.method,
            url: format!("{}{}", base_url, self.path),
            headers,
            body,
        })
    }
}

/// 将参数编码为查询字符串拼接到路径上
///
/// 值为 `null` 的参数会被忽略，数组参数以 `,` 连接各元素，键和值都经过百分号编码。
/// 路径中已有 `?` 时使用 `&` 连接。
pub(crate) fn append_query(path: &str, params: &Value) -> Result<String> {
    let query = match params {
        Value::Null => return Ok(path.to_string()),
        Value::Object(map) => encode_query(map),
        other => {
            return Err(Error::InvalidParameter(format!(
                "query params must be an object, got {}",
                other
            )));
        }
    };

    if query.is_empty() {
        return Ok(path.to_string());
    }

    let separator = if path.contains('?') { '&' } else { '?' };

    Ok(format!("{}{}{}", path, separator, query))
}

fn encode_query(params: &Map<String, Value>) -> String {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&render(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// 字符串原样输出，数组按元素以 `,` 连接，其余使用 JSON 文本
fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
