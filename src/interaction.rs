//! 界面交互副作用
//!
//! - [`Navigator`]: 401 时跳转登录页
//! - [`Notifier`]: 网络请求失败时弹出提示
//!
//! 默认实现只输出日志，宿主应用应当替换为真实的页面跳转和提示。

use tracing::{info, warn};

pub trait Navigator: Send + Sync {
    fn navigate_to(&self, url: &str);
}

pub trait Notifier: Send + Sync {
    fn show_toast(&self, title: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_to(&self, url: &str) {
        info!("navigate to {}", url);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_toast(&self, title: &str) {
        warn!("toast: {}", title);
    }
}
