//! `longmen_api` - 龙门小程序后端 HTTP 访问层
//!
//! 为小程序客户端提供统一的请求管线：自动注入登录凭证、持久化会话状态、
//! 统一解析服务端响应，并在登录失效时清除凭证、跳转登录页。
//!
//!
//! ## 核心特性
//!
//! - **凭证管理**: token、会话 ID、用户 ID 独立保存，可持久化到文件。
//! - **自动提取**: 登录/注册响应中的 `Set-Cookie`、`X-Session-Id`、`X-User-Id` 和 token 自动保存。
//! - **统一处理**: 401 清除凭证并跳转登录页，网络失败弹出提示。
//! - **可替换**: 传输层、存储、页面跳转与提示均可注入，方便集成和测试。
//! - **并发性**: 客户端可克隆，多个请求可以同时进行。
//!
//! ## 快速开始
//!
//! ```no_run
//! use longmen_api::{Client, Config};
//! use serde_json::{Value, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_config(&Config::from_env())?;
//!
//!     client.login("longmen", "12345678").await?;
//!
//!     let response = client
//!         .post::<Value>("/api/attraction/list/page", json!({ "current": 1, "pageSize": 10 }))
//!         .await?;
//!     println!("{:?}", response.data);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod credential;
mod request;
mod response;

pub mod constants;
pub mod error;
pub mod interaction;
pub mod storage;
pub mod transport;
pub mod user;

pub type Result<T> = std::result::Result<T, error::Error>;
pub use client::{Client, ClientBuilder};
pub use config::Config;
pub use credential::{CredentialKey, CredentialStore};
pub use response::ApiResponse;
