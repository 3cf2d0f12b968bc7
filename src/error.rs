//! 请求管线错误处理模块
//!
//! 该模块定义了请求管线在构建、发送和处理响应过程中可能遇到的所有错误类型。
//!
//! # 错误分类
//!
//! 管线只拦截两类终止性错误：
//!
//! - [`Error::Unauthorized`]: 服务端返回 401，本地凭证已被清除并跳转登录页
//! - 传输错误：[`Error::Reqwest`] 或 [`Error::Transport`]，未收到任何响应
//!
//! 其余情况（业务码非 0、非 401 的 HTTP 状态码）不会被转换为错误，
//! 由调用方自行解读 [`ApiResponse`](crate::ApiResponse) 中的 `code` 与 `message`。
//!
//! # 错误转换
//!
//! 模块自动实现了从常见第三方库错误到 [`Error`] 的转换：
//!
//! - `reqwest::Error` → `Error::Reqwest`
//! - `serde_json::Error` → `Error::SerdeJson`
//! - `std::io::Error` → `Error::Io`
//!
//! 这使得错误处理更加方便，可以使用 `?` 操作符自动转换。

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

/// 请求管线错误枚举
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 服务端返回 401，凭证已清除
    #[error("unauthorized, please login first")]
    Unauthorized,

    /// 请求参数错误
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// 自定义传输层返回的网络错误
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP 请求错误
    #[error("reqwest: {0}")]
    Reqwest(#[from] ReqwestError),

    /// JSON 序列化/反序列化错误
    #[error("json error: {0}")]
    SerdeJson(#[from] SerdeJsonError),

    /// 本地存储读写错误
    #[error("io error: {0}")]
    Io(#[from] IoError),
}

impl Error {
    /// 是否为网络层错误（未收到任何响应）
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Reqwest(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}
