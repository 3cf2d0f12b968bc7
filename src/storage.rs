//! 本地键值存储模块
//!
//! 凭证存储依赖一个同步的键值存储，读写不会挂起调用方。
//!
//! - [`MemoryStorage`]: 进程内存储，适合测试或无需持久化的场景
//! - [`FileStorage`]: 以 JSON 文件持久化，进程重启后仍然有效

use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::Result;

/// 同步键值存储
///
/// 所有操作都是全函数：单个键的写入是原子的，多个请求交错读写时不会损坏数据。
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// JSON 文件存储
///
/// 内存中保存完整的键值表，每次修改后整体写回文件（先写临时文件再重命名）。
/// 写盘失败只记录警告，内存中的值依然生效。
///
/// ```no_run
/// use longmen_api::storage::{FileStorage, Storage};
///
/// # fn example() -> longmen_api::Result<()> {
/// let storage = FileStorage::open("/tmp/longmen/storage.json")?;
/// storage.set("token", "abc");
/// assert_eq!(storage.get("token").as_deref(), Some("abc"));
/// # Ok(())
/// # }
/// ```
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// 打开存储文件，文件不存在时视为空存储
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            HashMap::new()
        };

        debug!("opened storage {:?} with {} keys", path, entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Err(e) = write_atomic(&self.path, entries) {
            warn!("failed to persist storage {:?}: {}", self.path, e);
        }
    }
}

fn write_atomic(path: &Path, entries: &HashMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(entries)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

impl fmt::Debug for FileStorage {
    // 存储内容包含凭证，不打印
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .field("keys", &self.entries.read().len())
            .finish()
    }
}
