//! 客户端错误类型与错误消息归一化

use serde::Deserialize;
use thiserror::Error;

use crate::web::http::HttpError;

pub const NETWORK_UNREACHABLE_MESSAGE: &str =
    "Unable to connect to server. Please check your connection.";
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// API 调用错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 传输层不可达
    #[error("network error: {0}")]
    Network(String),
    /// 401：会话已被清除并跳转登录页
    #[error("session expired")]
    Unauthorized,
    /// 非 2xx 响应，`message` 为响应体中的结构化错误消息
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    /// 响应体无法解析
    #[error("invalid response: {0}")]
    Decode(String),
    /// 请求无法构建
    #[error("invalid request: {0}")]
    Request(String),
    /// 登录响应中没有 access_token
    #[error("No access token received")]
    MissingToken,
    /// 会话无法写入本地存储
    #[error("Unable to save your session in this browser")]
    SessionNotSaved,
}

impl ApiError {
    /// 从非 2xx 响应构建错误
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: extract_message(body),
        }
    }

    /// 归一化为面向用户的单条消息
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Network(_) => NETWORK_UNREACHABLE_MESSAGE.to_string(),
            ApiError::MissingToken | ApiError::SessionNotSaved => self.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::NetworkError(msg) => ApiError::Network(msg),
            HttpError::RequestBuildFailed(msg) => ApiError::Request(msg),
            HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// 提取错误消息：优先 `message`，其次 `detail`（字符串，或校验错误列表的第一条 `msg`）
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    if let Some(message) = parsed.message.filter(|m| !m.is_empty()) {
        return Some(message);
    }
    match parsed.detail? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_structured_message() {
        let err = ApiError::from_response(
            400,
            r#"{"error": true, "message": "Title taken", "code": "CONFLICT", "detail": "x"}"#,
        );
        assert_eq!(err.user_message(), "Title taken");
    }

    #[test]
    fn falls_back_to_detail() {
        let err = ApiError::from_response(400, r#"{"detail": "Email already registered"}"#);
        assert_eq!(err.user_message(), "Email already registered");

        let err = ApiError::from_response(
            422,
            r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]}"#,
        );
        assert_eq!(err.user_message(), "value is not a valid email address");
    }

    #[test]
    fn network_and_generic_fallbacks() {
        let err: ApiError = HttpError::NetworkError("TypeError: Failed to fetch".into()).into();
        assert_eq!(err.user_message(), NETWORK_UNREACHABLE_MESSAGE);

        assert_eq!(
            ApiError::from_response(500, "<html>oops</html>").user_message(),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(ApiError::Decode("eof".into()).user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(ApiError::Unauthorized.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn missing_token_is_explicit() {
        assert_eq!(ApiError::MissingToken.user_message(), "No access token received");
    }
}
