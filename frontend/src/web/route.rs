//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、其属性以及路由守卫的状态机。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面
    #[default]
    Login,
    /// 注册页面
    Signup,
    /// 控制面板首页 (需要认证)
    Dashboard,
    /// 任务列表 (需要认证)
    Tasks,
    /// 个人资料 (需要认证)
    Profile,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(&['?', '#'][..]).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/tasks" => Self::Tasks,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Dashboard => "/dashboard",
            Self::Tasks => "/tasks",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Tasks | Self::Profile)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标：优先回到最初请求的页面
    pub fn auth_success_redirect(return_to: Option<AppRoute>) -> Self {
        return_to
            .filter(|r| r.requires_auth())
            .unwrap_or(Self::Dashboard)
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// ============================================================================
// 路由守卫状态机
// ============================================================================

/// 守卫视角下的认证状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// 会话尚未完成加载
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

impl GuardState {
    pub fn from_session(is_loading: bool, is_authenticated: bool) -> Self {
        match (is_loading, is_authenticated) {
            (true, _) => Self::Unknown,
            (false, true) => Self::Authenticated,
            (false, false) => Self::Unauthenticated,
        }
    }
}

/// 守卫决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 状态未知：既不渲染也不重定向
    Hold,
    /// 渲染目标路由
    Render(AppRoute),
    /// 重定向；`return_to` 为需要记住的原始目标
    Redirect {
        to: AppRoute,
        return_to: Option<AppRoute>,
    },
}

/// 根据认证状态决定如何处理导航目标
///
/// `return_to` 是之前记住的原始目标，仅在已认证用户离开登录页时使用。
pub fn guard(target: AppRoute, state: GuardState, return_to: Option<AppRoute>) -> GuardDecision {
    match state {
        GuardState::Unknown if target.requires_auth() || target.should_redirect_when_authenticated() => {
            GuardDecision::Hold
        }
        GuardState::Unauthenticated if target.requires_auth() => GuardDecision::Redirect {
            to: AppRoute::auth_failure_redirect(),
            return_to: Some(target),
        },
        GuardState::Authenticated if target.should_redirect_when_authenticated() => {
            GuardDecision::Redirect {
                to: AppRoute::auth_success_redirect(return_to),
                return_to: None,
            }
        }
        _ => GuardDecision::Render(target),
    }
}
