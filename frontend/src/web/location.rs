//! 整页跳转
//!
//! 与 `router` 的 History 导航不同，这里是硬跳转：页面重新加载，内存状态全部丢弃。
//! 用于登出和 401 这类需要彻底重置会话的场景。

pub trait Navigator {
    fn navigate_hard(&self, path: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate_hard(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
}
