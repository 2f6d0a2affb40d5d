use crate::auth::{refresh_user, use_auth};
use crate::components::dashboard::StatCard;
use crate::components::icons::*;
use crate::config::use_config;
use crate::query::use_task_list;
use leptos::prelude::*;
use taskdeck_shared::TaskFilters;
use taskdeck_shared::stats::TaskStats;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    refresh_user(&auth);

    let sample = use_config().dashboard_sample;
    let query = use_task_list(Signal::derive(move || TaskFilters::sample(sample)));

    let name = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.name.clone()))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Guest User".to_string())
    };
    let email = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| u.email.clone()))
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Not available".to_string())
    };

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

    view! {
        <h2 class="text-2xl font-bold">"Profile"</h2>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body flex-row items-center gap-6">
                <div class="avatar placeholder">
                    <div class="bg-primary text-primary-content rounded-full w-20">
                        <span class="text-3xl uppercase">
                            {move || name().chars().next().map(String::from).unwrap_or_default()}
                        </span>
                    </div>
                </div>
                <div class="space-y-2">
                    <div class="flex items-center gap-2 text-xl font-semibold">
                        <UserIcon attr:class="h-5 w-5 opacity-60" /> {name}
                    </div>
                    <div class="flex items-center gap-2 text-base-content/70">
                        <Mail attr:class="h-5 w-5 opacity-60" /> {email}
                    </div>
                </div>
            </div>
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
            <StatCard title="Completed" value=stat(|s| s.done) accent="text-success">
                <CheckCircle attr:class="h-8 w-8" />
            </StatCard>
            <StatCard title="Pending" value=stat(TaskStats::pending) accent="text-warning">
                <Clock attr:class="h-8 w-8" />
            </StatCard>
        </div>
    }
}
