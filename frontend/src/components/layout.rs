use crate::auth::{logout, use_auth};
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 已登录页面的外壳：侧边导航 + 顶部问候
#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let nav_class = move |route: AppRoute| {
        Signal::derive(move || {
            if router.current_route().get() == Some(route) {
                "flex items-center gap-3 rounded-lg px-3 py-2 bg-primary text-primary-content".to_string()
            } else {
                "flex items-center gap-3 rounded-lg px-3 py-2 hover:bg-base-200".to_string()
            }
        })
    };

    let user_name = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.name.clone()))
            .unwrap_or_else(|| "there".to_string())
    };

    let on_logout = move |_| logout(&auth);

    view! {
        <div class="min-h-screen bg-base-200 flex font-sans">
            <aside class="w-60 shrink-0 bg-base-100 shadow-xl hidden md:flex flex-col p-4 gap-2">
                <div class="flex items-center gap-2 px-3 py-4">
                    <ListChecks attr:class="h-7 w-7 text-primary" />
                    <span class="text-xl font-bold">"TaskDeck"</span>
                </div>
                <nav class="flex flex-col gap-1 flex-1">
                    <Link to=AppRoute::Dashboard class=nav_class(AppRoute::Dashboard)>
                        <LayoutDashboard attr:class="h-5 w-5" /> "Dashboard"
                    </Link>
                    <Link to=AppRoute::Tasks class=nav_class(AppRoute::Tasks)>
                        <ListChecks attr:class="h-5 w-5" /> "Tasks"
                    </Link>
                    <Link to=AppRoute::Profile class=nav_class(AppRoute::Profile)>
                        <UserIcon attr:class="h-5 w-5" /> "Profile"
                    </Link>
                </nav>
                <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                    <LogOut attr:class="h-4 w-4" /> "Sign out"
                </button>
            </aside>

            <div class="flex-1 flex flex-col min-w-0">
                <header class="navbar bg-base-100 shadow px-4 md:px-8">
                    <div class="flex-1">
                        <span class="text-lg">"Welcome back, " <span class="font-semibold">{user_name}</span></span>
                    </div>
                    <div class="flex-none md:hidden">
                        <button on:click=on_logout class="btn btn-ghost btn-sm gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Sign out"
                        </button>
                    </div>
                </header>
                <main class="p-4 md:p-8 max-w-7xl w-full mx-auto space-y-8">
                    {children()}
                </main>
            </div>
        </div>
    }
}
