//! API 客户端
//!
//! 所有请求都经过 [`ApiClient::send`]：
//! - 请求拦截：附加 `Content-Type`，存在令牌时附加 `Authorization: Bearer <token>`
//! - 响应拦截：401 时清除会话并硬跳转到登录页，调用方收到 [`ApiError::Unauthorized`]
//! - 错误归一化：非 2xx 响应转换为 [`ApiError::Status`]

use taskdeck_shared::protocol::ApiRequest;
use taskdeck_shared::{HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::session::SessionStore;
use crate::web::http::{FetchClient, HttpClient, HttpRequest};
use crate::web::location::{BrowserNavigator, Navigator};
use crate::web::route::AppRoute;
use crate::web::storage::{KeyValueStore, LocalStorage};

#[derive(Clone)]
pub struct ApiClient<C = FetchClient, S = LocalStorage, N = BrowserNavigator> {
    base_url: String,
    http: C,
    session: SessionStore<S>,
    navigator: N,
}

impl ApiClient {
    /// 浏览器环境下的客户端
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.api_base_url,
            FetchClient,
            LocalStorage,
            BrowserNavigator,
        )
    }
}

impl<C, S, N> ApiClient<C, S, N>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn new(base_url: &str, http: C, storage: S, navigator: N) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session: SessionStore::new(storage),
            navigator,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 清除会话并整页跳转到登录页
    pub fn end_session(&self) {
        self.session.clear();
        self.navigator
            .navigate_hard(AppRoute::auth_failure_redirect().to_path());
    }

    /// 发送一个 API 请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let path = req.path();
        let mut http_req = HttpRequest::new(&self.url(&path), R::METHOD)
            .with_header(HEADER_CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.token() {
            http_req = http_req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if let Some(body) = req.body() {
            let json = serde_json::to_string(body).map_err(|e| ApiError::Request(e.to_string()))?;
            http_req = http_req.with_body(json);
        }

        let resp = self.http.send(http_req).await.map_err(|e| {
            log_warn!("[Api] {} {} failed: {}", R::METHOD.as_str(), path, e);
            ApiError::from(e)
        })?;

        if resp.status == 401 {
            log_warn!(
                "[Api] {} {} returned 401, clearing session",
                R::METHOD.as_str(),
                path
            );
            self.end_session();
            return Err(ApiError::Unauthorized);
        }

        if !resp.ok() {
            log_error!(
                "[Api] {} {} returned {}",
                R::METHOD.as_str(),
                path,
                resp.status
            );
            return Err(ApiError::from_response(resp.status, &resp.body));
        }

        Ok(R::decode(&resp.body)?)
    }
}
