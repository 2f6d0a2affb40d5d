//! 认证模块
//!
//! 管理内存中的认证状态，与路由系统解耦。
//! `AuthContext` 是认证状态的唯一写入者，路由服务通过注入的守卫信号读取它。

use leptos::prelude::*;
use taskdeck_shared::{LoginRequest, SignupAck, SignupRequest};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::{AuthService, AuthState};
use crate::web::route::GuardState;

/// 认证上下文
///
/// 包含读写信号和共享的 API 客户端，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    set_state: WriteSignal<AuthState>,
    pub api: StoredValue<ApiClient>,
    /// 登录页顶部的一次性提示（例如注册成功）
    pub notice: RwSignal<Option<String>>,
}

impl AuthContext {
    pub fn new(api: ApiClient) -> Self {
        let (state, set_state) = signal(AuthState::loading());
        Self {
            state,
            set_state,
            api: StoredValue::new(api),
            notice: RwSignal::new(None),
        }
    }

    /// 守卫状态信号（用于路由服务注入）
    pub fn guard_state_signal(&self) -> Signal<GuardState> {
        let state = self.state;
        Signal::derive(move || {
            state.with(|s| GuardState::from_session(s.is_loading, s.is_authenticated))
        })
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 从存储同步恢复会话，完成后才结束加载状态
pub fn init_auth(ctx: &AuthContext) {
    let restored = ctx.api.with_value(|api| AuthService::new(api).hydrate());
    ctx.set_state.set(restored);
}

/// 登录并保存状态
///
/// 成功后由路由服务监听认证状态变化完成跳转。
pub async fn login(ctx: &AuthContext, credentials: LoginRequest) -> Result<(), ApiError> {
    let api = ctx.api.get_value();
    let state = AuthService::new(&api).login(&credentials).await?;
    ctx.set_state.set(state);
    Ok(())
}

/// 注册，不改变认证状态
pub async fn signup(ctx: &AuthContext, data: SignupRequest) -> Result<SignupAck, ApiError> {
    let api = ctx.api.get_value();
    AuthService::new(&api).signup(&data).await
}

/// 注销：清除存储与内存状态，并整页跳转到登录页
pub fn logout(ctx: &AuthContext) {
    let state = ctx.api.with_value(|api| AuthService::new(api).logout());
    ctx.set_state.set(state);
}

/// 从存储重新读取用户记录
pub fn refresh_user(ctx: &AuthContext) {
    let user = ctx.api.with_value(|api| AuthService::new(api).refresh_user());
    ctx.set_state.update(|state| {
        state.is_authenticated = state.is_authenticated && user.is_some();
        state.user = user;
    });
}
