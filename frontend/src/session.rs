//! 会话持久化与认证流程
//!
//! `SessionStore` 负责令牌和用户记录在存储中的读写，`AuthService` 在其上实现登录、注册、登出。
//! 两者都不依赖 Leptos，内存状态由 `crate::auth::AuthContext` 持有。

use taskdeck_shared::{LoginRequest, SignupAck, SignupRequest, User};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::web::http::HttpClient;
use crate::web::location::Navigator;
use crate::web::storage::KeyValueStore;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user";

/// 内存中的认证状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// 会话尚未从存储中加载
    pub is_loading: bool,
}

impl AuthState {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get(ACCESS_TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    /// 读取用户记录，无法解析时视为不存在
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log_warn!("[Session] Discarding unreadable user record: {}", e);
                None
            }
        }
    }

    pub fn save(&self, token: &str, user: &User) -> bool {
        let Ok(json) = serde_json::to_string(user) else {
            return false;
        };
        self.storage.set(ACCESS_TOKEN_KEY, token) && self.storage.set(USER_KEY, &json)
    }

    pub fn clear(&self) {
        self.storage.delete(ACCESS_TOKEN_KEY);
        self.storage.delete(USER_KEY);
    }

    /// 从存储恢复认证状态
    ///
    /// 令牌和用户记录必须同时存在，只剩一半的会话会被清除。
    pub fn hydrate(&self) -> AuthState {
        match (self.token(), self.user()) {
            (Some(_), Some(user)) => {
                log_info!("[Session] Restored session for {}", user.email);
                AuthState::signed_in(user)
            }
            (None, None) => AuthState::signed_out(),
            _ => {
                log_warn!("[Session] Incomplete session in storage, clearing");
                self.clear();
                AuthState::signed_out()
            }
        }
    }
}

/// 认证流程
pub struct AuthService<'a, C, S, N> {
    client: &'a ApiClient<C, S, N>,
}

impl<'a, C, S, N> AuthService<'a, C, S, N>
where
    C: HttpClient,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn new(client: &'a ApiClient<C, S, N>) -> Self {
        Self { client }
    }

    /// 登录并持久化令牌与派生的用户记录
    ///
    /// 响应中没有令牌时返回 [`ApiError::MissingToken`]，不写入任何内容。
    /// 存储写入失败时清除已写入的部分并返回 [`ApiError::SessionNotSaved`]。
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthState, ApiError> {
        let resp = self.client.auth().login(credentials).await?;
        let token = resp
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)?;

        let user = User::from_login_email(&credentials.email);
        if !self.client.session().save(&token, &user) {
            log_warn!("[Session] Failed to persist session, discarding partial write");
            self.client.session().clear();
            return Err(ApiError::SessionNotSaved);
        }
        log_info!("[Session] Signed in as {}", user.email);
        Ok(AuthState::signed_in(user))
    }

    /// 注册新用户，不会自动登录
    pub async fn signup(&self, data: &SignupRequest) -> Result<SignupAck, ApiError> {
        let ack = self.client.auth().signup(data).await?;
        log_info!("[Session] Account created for {}", data.email);
        Ok(ack)
    }

    /// 清除会话并跳转到登录页
    pub fn logout(&self) -> AuthState {
        log_info!("[Session] Signing out");
        self.client.end_session();
        AuthState::signed_out()
    }

    /// 从存储重新读取用户记录，不发起网络请求
    pub fn refresh_user(&self) -> Option<User> {
        self.client.session().user()
    }

    pub fn hydrate(&self) -> AuthState {
        self.client.session().hydrate()
    }
}
