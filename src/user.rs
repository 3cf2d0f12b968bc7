//! 用户接口模块
//!
//! 提供登录、注册、退出登录以及当前用户信息的读取和更新。
//!
//! # 凭证
//!
//! 登录和注册请求通过 [`Client::post_auth`] 发送，响应中的会话 ID、用户 ID 和 token
//! 会被自动保存；退出登录后本地凭证会被清除。
//!
//! # 快速开始
//!
//! ```no_run
//! use longmen_api::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("http://localhost:8090");
//!
//! let user = client.login("longmen", "12345678").await?;
//! println!("登录用户: {:?}", user.map(|u| u.user_account().to_string()));
//!
//! let current = client.current_user().await?;
//! println!("当前用户: {:?}", current.data);
//!
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::{Result, client::Client, constants, response::ApiResponse};

/// 用户信息（脱敏）
///
/// # 字段说明
///
/// - `gender`: 性别，0-未知，1-男性，2-女性
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserVo {
    id: i64,
    #[serde(default)]
    user_account: String,
    user_name: Option<String>,
    user_avatar: Option<String>,
    user_role: Option<String>,
    gender: Option<i32>,
    age: Option<i32>,
    create_time: Option<String>,
    update_time: Option<String>,
}

impl UserVo {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user_account(&self) -> &str {
        &self.user_account
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn user_avatar(&self) -> Option<&str> {
        self.user_avatar.as_deref()
    }

    pub fn user_role(&self) -> Option<&str> {
        self.user_role.as_deref()
    }

    pub fn gender(&self) -> Option<i32> {
        self.gender
    }

    pub fn age(&self) -> Option<i32> {
        self.age
    }

    pub fn create_time(&self) -> Option<&str> {
        self.create_time.as_deref()
    }

    pub fn update_time(&self) -> Option<&str> {
        self.update_time.as_deref()
    }
}

/// 登录接口返回的完整用户信息
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten)]
    profile: UserVo,
    is_delete: Option<i32>,
    user_password: Option<String>,
}

impl User {
    pub fn profile(&self) -> &UserVo {
        &self.profile
    }

    pub fn id(&self) -> i64 {
        self.profile.id
    }

    pub fn user_account(&self) -> &str {
        &self.profile.user_account
    }

    pub fn is_deleted(&self) -> bool {
        self.is_delete.unwrap_or(0) != 0
    }
}

impl std::fmt::Debug for User {
    // 为了安全，不打印密码
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("profile", &self.profile)
            .field("is_delete", &self.is_delete)
            .field("user_password", &self.user_password.as_ref().map(|_| "********"))
            .finish()
    }
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginRequest {
    pub user_account: String,
    pub user_password: String,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserRegisterRequest {
    pub user_account: String,
    pub user_password: String,
    pub check_password: String,
}

/// 更新用户信息，未设置的字段不会发送
#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

impl Client {
    /// 获取当前登录用户信息
    pub async fn current_user(&self) -> Result<ApiResponse<UserVo>> {
        self.get(constants::CURRENT_USER_END_POINT, ()).await
    }

    /// 用户登录
    ///
    /// 成功后会话 ID、用户 ID 和 token 会保存到凭证存储中，返回响应中的用户信息。
    ///
    /// # 参数
    ///
    /// - `user_account`: 用户账号
    /// - `user_password`: 用户密码
    #[instrument(skip(self, user_password))]
    pub async fn login(&self, user_account: &str, user_password: &str) -> Result<Option<User>> {
        let request = UserLoginRequest {
            user_account: user_account.to_string(),
            user_password: user_password.to_string(),
        };

        let response = self
            .user_login(&request)
            .await
            .inspect_err(|e| error!("login failed: {}", e))?;

        // 非 2xx 响应不会触发自动提取，这里再读取一次响应头
        self.credentials()
            .save(None, response.session_id(), response.user_id());

        debug!("login response code: {:?}", response.code);

        Ok(response.into_data())
    }

    /// 用户登录，返回完整的响应
    pub async fn user_login(&self, request: &UserLoginRequest) -> Result<ApiResponse<User>> {
        self.post_auth(constants::LOGIN_END_POINT, request).await
    }

    /// 用户注册，返回新用户 ID
    pub async fn register(&self, request: &UserRegisterRequest) -> Result<ApiResponse<i64>> {
        self.post_auth(constants::REGISTER_END_POINT, request).await
    }

    /// 退出登录
    ///
    /// 无论请求结果如何，本地凭证都会被清除。
    pub async fn logout(&self) -> Result<ApiResponse<bool>> {
        let result = self.post(constants::LOGOUT_END_POINT, ()).await;

        self.credentials().clear();

        result
    }

    /// 更新当前用户信息
    pub async fn update_user(&self, request: &UserUpdateRequest) -> Result<ApiResponse<bool>> {
        self.post(constants::UPDATE_USER_END_POINT, request).await
    }
}
