//! 日期工具模块
//!
//! 后端返回的日期可能是 `YYYY-MM-DD`，也可能是带时间的 ISO 8601 / RFC 3339 字符串。
//! 这里统一解析为 `NaiveDate`，用于展示和 `<input type="date">` 回填。

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const INPUT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// 解析日期字符串
///
/// 返回 None 如果解析失败
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, INPUT_FORMAT) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// 展示格式，如 `Mar 1, 2025`
pub fn format_display(s: &str) -> Option<String> {
    parse_date(s).map(|d| d.format(DISPLAY_FORMAT).to_string())
}

/// 表单回填格式 `YYYY-MM-DD`，无法解析时返回空串
pub fn to_input_value(s: &str) -> String {
    parse_date(s)
        .map(|d| d.format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}
