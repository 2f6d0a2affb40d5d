//! 运行时配置
//!
//! 前端没有进程环境变量，配置在构建时通过 `option_env!` 注入
//! （例如 `TASKDECK_API_BASE_URL=https://api.example.com trunk build`），未定义时使用默认值。

use leptos::prelude::*;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_DASHBOARD_SAMPLE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端 API 根地址
    pub api_base_url: String,
    /// 任务列表每页条数
    pub page_size: u32,
    /// 仪表盘 / 个人资料页统计所取的任务条数
    pub dashboard_sample: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            option_env!("TASKDECK_API_BASE_URL"),
            option_env!("TASKDECK_PAGE_SIZE"),
            option_env!("TASKDECK_DASHBOARD_SAMPLE"),
        )
    }

    fn from_vars(base_url: Option<&str>, page_size: Option<&str>, sample: Option<&str>) -> Self {
        Self {
            api_base_url: base_url
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            page_size: parse_positive(page_size).unwrap_or(DEFAULT_PAGE_SIZE),
            dashboard_sample: parse_positive(sample).unwrap_or(DEFAULT_DASHBOARD_SAMPLE),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_vars(None, None, None)
    }
}

/// 从 Context 获取配置，未提供时使用默认值
pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_default()
}

fn parse_positive(v: Option<&str>) -> Option<u32> {
    v?.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.dashboard_sample, 100);
    }

    #[test]
    fn overrides_and_invalid_values() {
        let cfg = AppConfig::from_vars(Some(" https://api.example.com/ "), Some("25"), Some("0"));
        assert_eq!(cfg.api_base_url, "https://api.example.com/");
        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.dashboard_sample, 100);

        let cfg = AppConfig::from_vars(Some(""), Some("ten"), None);
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.page_size, 10);
    }
}
