//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，验证步骤委托给 `route::guard`。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision, GuardState, guard};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态：push 用于用户导航，replace 用于重定向和状态重算
fn write_history(path: &str, use_push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = if use_push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入守卫状态信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 用户最近请求的路由
    requested: RwSignal<AppRoute>,
    /// 当前渲染的路由，`None` 表示等待会话加载
    current_route: RwSignal<Option<AppRoute>>,
    /// 被重定向到登录页之前的原始目标
    return_to: RwSignal<Option<AppRoute>>,
    /// 守卫状态（注入的信号，实现解耦）
    guard_state: Signal<GuardState>,
}

impl RouterService {
    fn new(guard_state: Signal<GuardState>) -> Self {
        let router = Self {
            requested: RwSignal::new(AppRoute::from_path(&current_path())),
            current_route: RwSignal::new(None),
            return_to: RwSignal::new(None),
            guard_state,
        };
        router.resolve(router.requested.get_untracked(), false);
        router
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> Signal<Option<AppRoute>> {
        self.current_route.into()
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.resolve(AppRoute::from_path(path), true);
    }

    /// 对目标路由执行守卫并加载
    fn resolve(&self, target: AppRoute, use_push: bool) {
        let state = self.guard_state.get_untracked();
        let decision = guard(target, state, self.return_to.get_untracked());

        match decision {
            GuardDecision::Hold => {
                self.requested.set(target);
                write_history(target.to_path(), use_push);
                self.show(None);
            }
            GuardDecision::Render(route) => {
                self.requested.set(route);
                if route != AppRoute::NotFound {
                    write_history(route.to_path(), use_push);
                }
                self.show(Some(route));
            }
            GuardDecision::Redirect { to, return_to } => {
                log_info!("[Router] {} -> {} ({:?})", target, to, state);
                self.return_to.set(return_to);
                self.requested.set(to);
                write_history(to.to_path(), use_push);
                self.show(Some(to));
            }
        }
    }

    // 路由未变化时不触发重新渲染
    fn show(&self, route: Option<AppRoute>) {
        if self.current_route.get_untracked() != route {
            self.current_route.set(route);
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        // popstate 时也执行守卫逻辑
        let closure = Closure::<dyn Fn()>::new(move || {
            router.resolve(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时对请求的路由重新执行守卫
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let state = router.guard_state.get();
            log_info!("[Router] Auth state changed: {:?}", state);
            router.resolve(router.requested.get_untracked(), false);
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(guard_state: Signal<GuardState>) -> RouterService {
    let router = RouterService::new(guard_state);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone + Copy {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 守卫状态信号
    guard_state: Signal<GuardState>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(guard_state);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件，会话加载期间只显示加载指示。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || match router.current_route().get() {
        Some(route) => matcher(route),
        None => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接，点击时走路由服务而不是整页加载
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    /// 链接样式
    #[prop(into)]
    class: Signal<String>,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <a href=to.to_path() class=move || class.get() on:click=on_click>
            {children()}
        </a>
    }
}
