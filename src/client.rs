use crate::{
    Result,
    config::Config,
    constants,
    credential::CredentialStore,
    error::Error,
    interaction::{LogNavigator, LogNotifier, Navigator, Notifier},
    request::Outbound,
    response::ApiResponse,
    storage::{FileStorage, MemoryStorage, Storage},
    transport::{ReqwestTransport, Transport},
};
use regex::Regex;
use reqwest::{
    Method,
    header::{HeaderMap, SET_COOKIE},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    fmt,
    sync::{Arc, LazyLock},
};
use tracing::{debug, instrument, warn};

static SESSION_COOKIE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"JSESSIONID=([^;]+)").expect("valid session cookie pattern"));

///
/// 请求管线：构建请求、注入凭证、发送请求并处理响应。
///
/// # 功能特性
///
/// - 自动附加 `Authorization`、`Cookie`、`X-Session-Id`、`X-User-Id` 请求头
/// - 登录/注册请求的响应中自动提取并保存会话 ID、用户 ID 和 token
/// - 服务端返回 401 时清除凭证并跳转登录页
/// - 网络请求失败时弹出提示
///
/// # 快速开始
///
/// ```no_run
/// use longmen_api::Client;
/// use serde_json::{Value, json};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new("http://localhost:8090");
///
///     // 登录，响应中的会话信息会被自动保存
///     let body = json!({ "userAccount": "longmen", "userPassword": "12345678" });
///     client.post_auth::<Value>("/api/user/login", &body).await?;
///
///     // 之后的请求自动携带凭证
///     let response = client.get::<Value>("/api/attraction/get", json!({ "id": 1 })).await?;
///     println!("code: {:?}, data: {:?}", response.code, response.data);
///
///     Ok(())
/// }
/// ```
///
/// # 错误
///
/// 只有两种情况会返回错误：
///
/// - 服务端返回 401：[`Error::Unauthorized`]
/// - 网络层失败：传输层返回的原始错误
///
/// 业务码非 0、其他 HTTP 状态码以及无法解析的响应体都会正常返回 [`ApiResponse`]，由调用方处理。
///
/// # 并发
///
/// `Client` 可以廉价克隆并在多个任务中同时使用，各个请求互不依赖，完成顺序不做保证。
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// 创建使用默认传输层和内存凭证存储的客户端
    ///
    /// # 示例
    ///
    /// ```
    /// use longmen_api::Client;
    ///
    /// let client = Client::new("http://localhost:8090/");
    /// assert_eq!(client.base_url(), "http://localhost:8090");
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url: base_url.trim_end_matches('/').to_string(),
                credentials: CredentialStore::in_memory(),
                transport: Arc::new(ReqwestTransport::new()),
                navigator: Arc::new(LogNavigator),
                notifier: Arc::new(LogNotifier),
            }),
        }
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// 根据配置创建客户端，配置了存储路径时凭证持久化到文件
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = ClientBuilder::new().base_url(&config.base_url);

        if let Some(path) = &config.storage_path {
            builder = builder.storage(Arc::new(FileStorage::open(path)?));
        }

        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// 发送 GET 请求
    ///
    /// `params` 会被编码为查询字符串，值为 `None`/`null` 的字段会被忽略，传 `()` 表示没有参数。
    ///
    /// ```no_run
    /// use longmen_api::Client;
    /// use serde_json::{Value, json};
    ///
    /// # async fn example(client: Client) -> longmen_api::Result<()> {
    /// // 请求 /api/attraction/get/ai?id=1&age=18
    /// let response = client
    ///     .get::<String>("/api/attraction/get/ai", json!({ "id": 1, "age": 18, "preference": null }))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: impl Serialize,
    ) -> Result<ApiResponse<T>> {
        let params = serde_json::to_value(params)?;

        self.request(Outbound::get(path, params)?).await
    }

    /// 发送 POST 请求，`body` 作为 JSON 请求体，传 `()` 表示没有请求体
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl Serialize,
    ) -> Result<ApiResponse<T>> {
        self.send_with_body(Method::POST, path, body, false).await
    }

    /// 发送登录/注册类 POST 请求
    ///
    /// 与 [`Client::post`] 相同，但状态码为 2xx 时会从响应中提取凭证并保存：
    ///
    /// - `Set-Cookie` 中的 `JSESSIONID`
    /// - `X-Session-Id`、`X-User-Id` 响应头
    /// - 响应体 `data.token`
    pub async fn post_auth<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl Serialize,
    ) -> Result<ApiResponse<T>> {
        self.send_with_body(Method::POST, path, body, true).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl Serialize,
    ) -> Result<ApiResponse<T>> {
        self.send_with_body(Method::PUT, path, body, false).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        body: impl Serialize,
    ) -> Result<ApiResponse<T>> {
        self.send_with_body(Method::DELETE, path, body, false).await
    }

    async fn send_with_body<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: impl Serialize,
        is_auth_flow: bool,
    ) -> Result<ApiResponse<T>> {
        let body = serde_json::to_value(body)?;

        self.request(Outbound::with_body(method, path, body, is_auth_flow))
            .await
    }

    #[instrument(skip(self, outbound), fields(method = %outbound.method, path = %outbound.path))]
    async fn request<T: DeserializeOwned>(&self, outbound: Outbound) -> Result<ApiResponse<T>> {
        let is_auth_flow = outbound.is_auth_flow;
        let request = outbound.into_http(&self.inner.base_url, self.inner.credentials.current_headers())?;

        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("request failed: {}", e);
                self.inner.notifier.show_toast(constants::NETWORK_FAILURE_TOAST);
                return Err(e);
            }
        };

        debug!("status: {}", response.status);

        // 401 的响应体不解析
        if response.status == 401 {
            warn!("unauthorized, clearing credentials");
            self.inner.credentials.clear();
            self.inner.navigator.navigate_to(constants::LOGIN_PAGE);
            return Err(Error::Unauthorized);
        }

        let body = parse_body(&response.body);

        if is_auth_flow && response.is_success() {
            self.capture_credentials(&response.headers, body.as_ref());
        }

        Ok(ApiResponse::from_body(
            body,
            &response.body,
            response.status,
            response.headers,
        ))
    }

    /// 从登录类响应中提取凭证，缺失的字段直接忽略
    fn capture_credentials(&self, headers: &HeaderMap, body: Option<&Value>) {
        let credentials = &self.inner.credentials;

        if let Some(session_id) = session_from_set_cookie(headers) {
            debug!("session id found in set-cookie");
            credentials.save_session_id(&session_id);
        }

        if let Some(session_id) = header_value(headers, constants::SESSION_ID_HEADER) {
            credentials.save_session_id(session_id);
        }

        if let Some(user_id) = header_value(headers, constants::USER_ID_HEADER) {
            credentials.save_user_id(user_id);
        }

        if let Some(token) = body.and_then(token_from_body) {
            debug!("token found in response body");
            credentials.save_token(&token);
        }
    }
}

/// 空响应体或非 JSON 响应体返回 `None`
fn parse_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    serde_json::from_slice(body)
        .inspect_err(|e| warn!("response body is not json: {}", e))
        .ok()
}

/// 只检查第一个 `Set-Cookie` 值，且 `JSESSIONID` 区分大小写
fn session_from_set_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie = headers.get(SET_COOKIE)?.to_str().ok()?;

    SESSION_COOKIE
        .captures(cookie)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

fn token_from_body(body: &Value) -> Option<String> {
    match body.get("data")?.get("token")? {
        Value::String(token) if !token.is_empty() => Some(token.clone()),
        Value::Number(token) => Some(token.to_string()),
        _ => None,
    }
}

struct ClientInner {
    base_url: String,
    credentials: CredentialStore,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientInner")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// 客户端构建器
///
/// 未设置的部分使用默认实现：`reqwest` 传输层、内存凭证存储、仅输出日志的跳转与提示。
///
/// # 示例
///
/// ```
/// use std::sync::Arc;
/// use longmen_api::{Client, storage::MemoryStorage};
///
/// let client = Client::builder()
///     .base_url("https://longmen.example.com")
///     .storage(Arc::new(MemoryStorage::new()))
///     .build()
///     .unwrap();
///
/// assert_eq!(client.base_url(), "https://longmen.example.com");
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    storage: Option<Arc<dyn Storage>>,
    transport: Option<Arc<dyn Transport>>,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| constants::DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/');

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::InvalidParameter(
                "服务端地址必须以 http:// 或 https:// 开头".to_string(),
            ));
        }

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));

        Ok(Client {
            inner: Arc::new(ClientInner {
                base_url: base_url.to_string(),
                credentials: CredentialStore::new(storage),
                transport: self
                    .transport
                    .unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
                navigator: self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
                notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_session_from_set_cookie() {
        let map = headers(&[("Set-Cookie", "JSESSIONID=abc123; Path=/; HttpOnly")]);
        assert_eq!(session_from_set_cookie(&map).as_deref(), Some("abc123"));

        let map = headers(&[("set-cookie", "JSESSIONID=abc123")]);
        assert_eq!(session_from_set_cookie(&map).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_cookie_matching_is_narrow() {
        // 只检查第一个 Set-Cookie 值
        let map = headers(&[
            ("Set-Cookie", "theme=dark; Path=/"),
            ("Set-Cookie", "JSESSIONID=abc123; Path=/"),
        ]);
        assert!(session_from_set_cookie(&map).is_none());

        // 合并在同一个值中时可以匹配
        let map = headers(&[("Set-Cookie", "theme=dark; Path=/, JSESSIONID=abc123; Path=/")]);
        assert_eq!(session_from_set_cookie(&map).as_deref(), Some("abc123"));

        // 大小写不同不匹配
        let map = headers(&[("Set-Cookie", "jsessionid=abc123; Path=/")]);
        assert!(session_from_set_cookie(&map).is_none());

        assert!(session_from_set_cookie(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_token_from_body() {
        assert_eq!(
            token_from_body(&json!({ "code": 0, "data": { "token": "jwt" } })).as_deref(),
            Some("jwt")
        );
        assert_eq!(
            token_from_body(&json!({ "data": { "token": 42 } })).as_deref(),
            Some("42")
        );
        assert!(token_from_body(&json!({ "data": { "token": "" } })).is_none());
        assert!(token_from_body(&json!({ "data": { "id": 1 } })).is_none());
        assert!(token_from_body(&json!({ "data": null })).is_none());
        assert!(token_from_body(&json!({ "data": 7 })).is_none());
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(b"").is_none());
        assert!(parse_body(b"  \n").is_none());
        assert_eq!(parse_body(br#"{"code":0}"#), Some(json!({ "code": 0 })));
        assert!(parse_body(b"<html>").is_none());
    }

    #[test]
    fn test_builder_validates_base_url() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.base_url(), constants::DEFAULT_BASE_URL);

        let client = Client::builder()
            .base_url("https://longmen.example.com/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://longmen.example.com");

        let result = Client::builder().base_url("longmen.example.com").build();
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_from_config_uses_file_storage() {
        let dir = std::env::temp_dir().join(format!("longmen-api-config-{}", std::process::id()));
        let config = Config {
            base_url: "http://127.0.0.1:9000".to_string(),
            storage_path: Some(dir.join("storage.json")),
        };

        {
            let client = Client::from_config(&config).unwrap();
            client.credentials().save(Some("jwt"), None, Some("42"));
        }

        let client = Client::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
        assert_eq!(client.credentials().token().as_deref(), Some("jwt"));
        assert_eq!(client.credentials().user_id().as_deref(), Some("42"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
