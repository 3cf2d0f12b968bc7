//! 请求管线常量模块
//!
//! 定义服务端地址、本地存储键名、认证相关请求头以及界面交互文案等常量。
//!
//! # 分类
//!
//! ## 服务端
//!
//! - [`DEFAULT_BASE_URL`] - 默认服务端地址
//! - [`BASE_URL_ENV`] / [`STORAGE_PATH_ENV`] - 可覆盖配置的环境变量名
//!
//! ## 认证请求头
//!
//! - [`SESSION_ID_HEADER`] - 会话 ID
//! - [`USER_ID_HEADER`] - 用户 ID
//! - [`SESSION_COOKIE_NAME`] - 会话 Cookie 名称
//!
//! ## 界面交互
//!
//! - [`LOGIN_PAGE`] - 401 时跳转的登录页
//! - [`NETWORK_FAILURE_TOAST`] - 网络请求失败时的提示文案
//!
//! ## 用户接口
//!
//! - [`LOGIN_END_POINT`] / [`REGISTER_END_POINT`] - 登录与注册，响应中携带凭证
//! - [`LOGOUT_END_POINT`] - 退出登录
//! - [`CURRENT_USER_END_POINT`] / [`UPDATE_USER_END_POINT`] - 当前用户信息

/// 默认服务端地址
pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";

/// 覆盖服务端地址的环境变量
pub const BASE_URL_ENV: &str = "LONGMEN_BASE_URL";

/// 覆盖凭证存储文件路径的环境变量
pub const STORAGE_PATH_ENV: &str = "LONGMEN_STORAGE_PATH";

/// 默认存储目录名
pub const APP_NAME: &str = "longmen-api";

/// 默认存储文件名
pub const STORAGE_FILE: &str = "storage.json";

/// 默认请求内容类型
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 会话 ID 请求头，部分小程序环境无法携带 Cookie，需要额外传递
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// 用户 ID 请求头
pub const USER_ID_HEADER: &str = "x-user-id";

/// 会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "JSESSIONID";

/// 未授权时跳转的登录页
pub const LOGIN_PAGE: &str = "/pages/login/login";

/// 网络请求失败提示
pub const NETWORK_FAILURE_TOAST: &str = "网络请求失败";

/// 获取当前登录用户
pub const CURRENT_USER_END_POINT: &str = "/api/user/current";

/// 用户登录
pub const LOGIN_END_POINT: &str = "/api/user/login";

/// 用户退出登录
pub const LOGOUT_END_POINT: &str = "/api/user/logout";

/// 用户注册
pub const REGISTER_END_POINT: &str = "/api/user/register";

/// 更新当前用户信息
pub const UPDATE_USER_END_POINT: &str = "/api/user/update/my";
