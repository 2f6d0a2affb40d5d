use crate::components::icons::*;
use crate::config::use_config;
use crate::query::use_task_list;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use taskdeck_shared::TaskFilters;
use taskdeck_shared::date::format_display;
use taskdeck_shared::stats::TaskStats;

/// 单个统计卡片
#[component]
pub fn StatCard(
    title: &'static str,
    #[prop(into)] value: Signal<String>,
    /// 数值颜色
    accent: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="stat">
            <div class=format!("stat-figure {}", accent)>{children()}</div>
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value {}", accent)>{move || value.get()}</div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let sample = use_config().dashboard_sample;
    let query = use_task_list(Signal::derive(move || TaskFilters::sample(sample)));

    let stats = Memo::new(move |_| {
        query.with(|q| q.ready().map(|page| TaskStats::from_tasks(&page.data)))
    });
    let stat = move |pick: fn(&TaskStats) -> usize| {
        Signal::derive(move || {
            stats
                .get()
                .map(|s| pick(&s).to_string())
                .unwrap_or_else(|| "-".to_string())
        })
    };

    // 最近更新的 5 条任务
    let recent = move || {
        query.with(|q| {
            q.ready()
                .map(|page| {
                    let mut tasks = page.data.clone();
                    tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                    tasks.truncate(5);
                    tasks
                })
                .unwrap_or_default()
        })
    };

    view! {
        <div class="flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">"Dashboard"</h2>
                <p class="text-base-content/70 text-sm">"An overview of your tasks."</p>
            </div>
            <Link to=AppRoute::Tasks class="btn btn-primary gap-2">
                <Plus attr:class="h-4 w-4" /> "Manage tasks"
            </Link>
        </div>

        {move || query.with(|q| q.error().map(|msg| view! {
            <div role="alert" class="alert alert-error">
                <AlertCircle attr:class="h-5 w-5" />
                <span>{msg.to_string()}</span>
            </div>
        }))}

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <StatCard title="Total tasks" value=stat(|s| s.total) accent="text-primary">
                <ListChecks attr:class="h-8 w-8" />
            </StatCard>
            <StatCard title="To do" value=stat(|s| s.todo) accent="text-info">
                <CircleDashed attr:class="h-8 w-8" />
            </StatCard>
            <StatCard title="In progress" value=stat(|s| s.in_progress) accent="text-warning">
                <Clock attr:class="h-8 w-8" />
            </StatCard>
            <StatCard title="Done" value=stat(|s| s.done) accent="text-success">
                <CheckCircle attr:class="h-8 w-8" />
            </StatCard>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Recently updated"</h3>
                <Show when=move || query.with(|q| q.is_loading())>
                    <div class="py-6 text-center text-base-content/50">
                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                    </div>
                </Show>
                <Show when=move || query.with(|q| q.ready().is_some_and(|p| p.data.is_empty()))>
                    <p class="py-6 text-center text-base-content/50">"No tasks yet. Create one to get started."</p>
                </Show>
                <ul class="divide-y divide-base-200">
                    <For
                        each=recent
                        key=|t| (t.id.clone(), t.updated_at.clone())
                        children=move |task| {
                            let due = task.due_date.as_deref().and_then(format_display);
                            view! {
                                <li class="flex items-center justify-between py-3 gap-4">
                                    <span class="font-medium truncate">{task.title.clone()}</span>
                                    <div class="flex items-center gap-2 shrink-0">
                                        {due.map(|d| view! { <span class="text-sm text-base-content/60">{d}</span> })}
                                        <span class="badge badge-outline">{task.status.label()}</span>
                                    </div>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>
        </div>
    }
}
