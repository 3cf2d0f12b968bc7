//! 客户端配置
//!
//! 服务端地址和凭证存储路径可以通过环境变量覆盖：
//!
//! - `LONGMEN_BASE_URL`: 服务端地址，默认 `http://localhost:8090`
//! - `LONGMEN_STORAGE_PATH`: 凭证存储文件，默认位于系统数据目录下的 `longmen-api/storage.json`

use std::{env, path::PathBuf};

use crate::constants;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// 为 `None` 时凭证只保存在内存中
    pub storage_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            storage_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let base_url = env::var(constants::BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| constants::DEFAULT_BASE_URL.to_string());

        let storage_path = env::var_os(constants::STORAGE_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(Self::default_storage_path);

        Self {
            base_url,
            storage_path,
        }
    }

    pub fn default_storage_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(constants::APP_NAME).join(constants::STORAGE_FILE))
    }
}
