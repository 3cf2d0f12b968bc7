use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue};
use std::{fmt, sync::Arc};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};
use tracing::{debug, instrument, warn};

use crate::{
    constants,
    storage::{MemoryStorage, Storage},
};

/// 凭证在本地存储中的键名
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter)]
pub enum CredentialKey {
    #[strum(serialize = "token")]
    Token,
    #[strum(serialize = "sessionId")]
    SessionId,
    #[strum(serialize = "userId")]
    UserId,
}

/// 登录凭证存储
///
/// 保存 bearer token、会话 ID 和用户 ID 三个相互独立的字段。任意字段缺失都是合法状态，
/// 例如只有会话没有 token，此时生成的请求头只包含会话相关字段。
///
/// # 生命周期
///
/// - 登录成功后写入，每个字段在响应中被发现时单独更新
/// - 仅在服务端返回 401 或主动退出登录时整体清除
///
/// # 示例
///
/// ```
/// use longmen_api::CredentialStore;
///
/// let store = CredentialStore::in_memory();
/// store.save(Some("jwt"), Some("abc123"), None);
///
/// let headers = store.current_headers();
/// assert_eq!(headers["authorization"], "Bearer jwt");
/// assert_eq!(headers["cookie"], "JSESSIONID=abc123");
/// assert!(headers.get("x-user-id").is_none());
/// ```
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// 保存凭证
    ///
    /// 只写入非空的字段，`None` 或空字符串不会覆盖已有的值。
    #[instrument(skip_all)]
    pub fn save(&self, token: Option<&str>, session_id: Option<&str>, user_id: Option<&str>) {
        for (key, value) in [
            (CredentialKey::Token, token),
            (CredentialKey::SessionId, session_id),
            (CredentialKey::UserId, user_id),
        ] {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                debug!("save credential {}", key.as_ref());
                self.storage.set(key.as_ref(), value);
            }
        }
    }

    pub fn save_token(&self, token: &str) {
        self.save(Some(token), None, None);
    }

    pub fn save_session_id(&self, session_id: &str) {
        self.save(None, Some(session_id), None);
    }

    pub fn save_user_id(&self, user_id: &str) {
        self.save(None, None, Some(user_id));
    }

    /// 清除全部凭证
    pub fn clear(&self) {
        debug!("clear credentials");

        for key in CredentialKey::iter() {
            self.storage.remove(key.as_ref());
        }
    }

    pub fn token(&self) -> Option<String> {
        self.get(CredentialKey::Token)
    }

    pub fn session_id(&self) -> Option<String> {
        self.get(CredentialKey::SessionId)
    }

    pub fn user_id(&self) -> Option<String> {
        self.get(CredentialKey::UserId)
    }

    /// 是否持有 token 或会话
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() || self.session_id().is_some()
    }

    /// 根据当前保存的凭证生成请求头
    ///
    /// - `Authorization: Bearer <token>`
    /// - `Cookie: JSESSIONID=<sessionId>` 与 `X-Session-Id: <sessionId>`
    /// - `X-User-Id: <userId>`
    ///
    /// 没有任何凭证时返回空的请求头。无法作为请求头的值会被跳过。
    pub fn current_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(token) = self.token() {
            insert(&mut headers, AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(session_id) = self.session_id() {
            insert(
                &mut headers,
                COOKIE,
                format!("{}={}", constants::SESSION_COOKIE_NAME, session_id),
            );
            insert(
                &mut headers,
                HeaderName::from_static(constants::SESSION_ID_HEADER),
                session_id,
            );
        }

        if let Some(user_id) = self.user_id() {
            insert(
                &mut headers,
                HeaderName::from_static(constants::USER_ID_HEADER),
                user_id,
            );
        }

        headers
    }

    fn get(&self, key: CredentialKey) -> Option<String> {
        self.storage.get(key.as_ref()).filter(|v| !v.is_empty())
    }
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: String) {
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => warn!("skip credential header {}: invalid header value", name),
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for CredentialStore {
    // 为了安全，不打印 token
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("token", &self.token().map(|_| "********"))
            .field("session_id", &self.session_id())
            .field("user_id", &self.user_id())
            .finish()
    }
}
