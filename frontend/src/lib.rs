//! TaskDeck 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫状态机（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `client` / `api`: 带拦截器的 API 客户端与资源接口
//! - `session` / `auth`: 会话持久化与认证状态管理
//! - `query`: 任务列表查询缓存
//! - `components`: UI 组件层

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (leptos::logging::log!($($t)*))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (leptos::logging::warn!($($t)*))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (leptos::logging::error!($($t)*))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

mod api;
mod auth;
mod client;
mod components {
    pub mod confirm_dialog;
    pub mod dashboard;
    mod icons;
    pub mod layout;
    pub mod login;
    pub mod profile;
    pub mod signup;
    pub mod task_form_dialog;
    pub mod tasks;
}
mod config;
mod error;
mod query;
mod session;
#[cfg(test)]
mod testing;

use crate::auth::{AuthContext, init_auth};
use crate::client::ApiClient;
use crate::components::dashboard::DashboardPage;
use crate::components::layout::AppLayout;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::signup::SignupPage;
use crate::components::tasks::TasksPage;
use crate::config::AppConfig;
use crate::query::provide_task_queries;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，浏览器能力都以 trait 暴露，
// 便于在原生测试中替换为内存实现。
pub(crate) mod web {
    pub mod http;
    pub mod location;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Dashboard => view! { <AppLayout><DashboardPage /></AppLayout> }.into_any(),
        AppRoute::Tasks => view! { <AppLayout><TasksPage /></AppLayout> }.into_any(),
        AppRoute::Profile => view! { <AppLayout><ProfilePage /></AppLayout> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary">
                        "Back to dashboard"
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 配置与 API 客户端
    let config = AppConfig::from_env();
    log_info!("[App] Using API at {}", config.api_base_url);
    let auth_ctx = AuthContext::new(ApiClient::from_config(&config));
    provide_context(config);

    // 2. 创建认证上下文，并在渲染前从存储同步恢复会话
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    // 3. 任务查询缓存
    provide_task_queries();

    // 4. 获取守卫状态信号，用于注入路由服务（解耦！）
    let guard_state = auth_ctx.guard_state_signal();

    view! {
        // 路由器组件：注入守卫信号实现路由保护
        <Router guard_state=guard_state>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
