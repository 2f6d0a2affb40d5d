use crate::auth::use_auth;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::dashboard::StatCard;
use crate::components::icons::*;
use crate::components::task_form_dialog::TaskFormDialog;
use crate::config::use_config;
use crate::query::{use_task_list, use_task_queries};
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskdeck_shared::date::format_display;
use taskdeck_shared::stats::TaskStats;
use taskdeck_shared::{Task, TaskFilters, TaskPayload, TaskPriority, TaskStatus};

fn status_badge(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "badge badge-info badge-outline",
        TaskStatus::InProgress => "badge badge-warning badge-outline",
        TaskStatus::Done => "badge badge-success badge-outline",
    }
}

fn priority_badge(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "badge badge-ghost",
        TaskPriority::Medium => "badge badge-secondary",
        TaskPriority::High => "badge badge-error",
    }
}

#[component]
pub fn TasksPage() -> impl IntoView {
    let auth = use_auth();
    let queries = use_task_queries();
    let page_size = use_config().page_size;

    let filters = RwSignal::new(TaskFilters::first_page(page_size));
    let search_input = RwSignal::new(String::new());
    let query = use_task_list(filters.into());

    // 对话框状态
    let form_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<Task>::None);
    let saving = RwSignal::new(false);
    let form_error = RwSignal::new(Option::<String>::None);
    let confirm_open = RwSignal::new(false);
    let deleting = RwSignal::new(Option::<Task>::None);
    let delete_pending = RwSignal::new(false);

    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // 当前页统计
    let stats = Memo::new(move |_| {
        query.with(|q| {
            q.ready()
                .map(|page| TaskStats::from_tasks(&page.data))
                .unwrap_or_default()
        })
    });
    let stat = move |pick: fn(&TaskStats) -> usize| {
        Signal::derive(move || stats.with(|s| pick(s).to_string()))
    };

    // 删除末页最后一条后退回到新的末页
    Effect::new(move |_| {
        let target = query.with(|q| {
            q.ready()
                .and_then(|p| p.overflow_target(filters.with_untracked(|f| f.current_page())))
        });
        if let Some(page) = target {
            filters.update(|f| *f = f.clone().with_page(page));
        }
    });

    let current_page = move || filters.with(|f| f.current_page());
    let total_pages = move || {
        query.with(|q| q.ready().map(|p| p.total_pages()).unwrap_or(1))
    };
    let has_prev = move || query.with(|q| q.ready().is_some_and(|p| p.has_prev(current_page())));
    let has_next = move || query.with(|q| q.ready().is_some_and(|p| p.has_next(current_page())));

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let term = search_input.get_untracked();
        filters.update(|f| *f = f.clone().with_search(term));
    };

    let on_status_change = move |ev: leptos::ev::Event| {
        let status = event_target_value(&ev).parse::<TaskStatus>().ok();
        filters.update(|f| *f = f.clone().with_status(status));
    };

    let on_priority_change = move |ev: leptos::ev::Event| {
        let priority = event_target_value(&ev).parse::<TaskPriority>().ok();
        filters.update(|f| *f = f.clone().with_priority(priority));
    };

    let go_to_page = move |page: u32| {
        filters.update(|f| *f = f.clone().with_page(page));
    };

    let open_create = move |_| {
        editing.set(None);
        form_error.set(None);
        form_open.set(true);
    };

    let open_edit = move |task: Task| {
        editing.set(Some(task));
        form_error.set(None);
        form_open.set(true);
    };

    let open_delete = move |task: Task| {
        deleting.set(Some(task));
        confirm_open.set(true);
    };

    let handle_save = move |payload: TaskPayload| {
        let api = auth.api.get_value();
        let editing_id = editing.get_untracked().map(|t| t.id);
        saving.set(true);
        form_error.set(None);

        spawn_local(async move {
            let result = match editing_id.as_deref() {
                Some(id) => api.tasks().update(id, &payload).await,
                None => api.tasks().create(&payload).await,
            };
            match result {
                Ok(task) => {
                    queries.invalidate();
                    form_open.set(false);
                    let msg = if editing_id.is_some() {
                        format!("Task \"{}\" updated", task.title)
                    } else {
                        format!("Task \"{}\" created", task.title)
                    };
                    set_notification.set(Some((msg, false)));
                }
                Err(e) => {
                    log_error!("[Tasks] Failed to save task: {}", e);
                    form_error.set(Some(e.user_message()));
                }
            }
            saving.set(false);
        });
    };

    let handle_delete = move |_: ()| {
        let Some(task) = deleting.get_untracked() else {
            return;
        };
        let api = auth.api.get_value();
        delete_pending.set(true);

        spawn_local(async move {
            match api.tasks().delete(&task.id).await {
                Ok(()) => {
                    queries.invalidate();
                    set_notification.set(Some(("Task deleted".to_string(), false)));
                }
                Err(e) => {
                    log_error!("[Tasks] Failed to delete task {}: {}", task.id, e);
                    set_notification.set(Some((e.user_message(), true)));
                }
            }
            delete_pending.set(false);
            confirm_open.set(false);
            deleting.set(None);
        });
    };

    let delete_message = Signal::derive(move || {
        deleting.with(|t| match t {
            Some(task) => format!("\"{}\" will be permanently deleted.", task.title),
            None => String::new(),
        })
    });

    let rows = move || query.with(|q| q.ready().map(|p| p.data.clone()).unwrap_or_default());
    let is_empty = move || query.with(|q| q.ready().is_some_and(|p| p.data.is_empty()));

    view! {
        // 通知提示框
        {move || notification.get().map(|(msg, is_err)| view! {
            <div class="toast toast-top toast-end z-50">
                <div class=if is_err { "alert alert-error shadow-lg" } else { "alert alert-success shadow-lg" }>
                    <span>{msg}</span>
                </div>
            </div>
        })}

        <div class="flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">"Tasks"</h2>
                <p class="text-base-content/70 text-sm">"Create, filter and track your work."</p>
            </div>
            <button class="btn btn-primary gap-2" on:click=open_create>
                <Plus attr:class="h-4 w-4" /> "New task"
            </button>
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <StatCard title="On this page" value=stat(|s| s.total) accent="text-primary">
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
            <div class="card-body p-0">
                <div class="flex flex-col md:flex-row gap-3 p-6 pb-2">
                    <form class="join flex-1" on:submit=on_search>
                        <input
                            type="search"
                            placeholder="Search tasks..."
                            class="input input-bordered join-item w-full"
                            on:input=move |ev| search_input.set(event_target_value(&ev))
                            prop:value=move || search_input.get()
                        />
                        <button type="submit" class="btn join-item">
                            <Search attr:class="h-4 w-4" /> "Search"
                        </button>
                    </form>
                    <select class="select select-bordered" on:change=on_status_change>
                        <option value="" selected=move || filters.with(|f| f.status.is_none())>"All statuses"</option>
                        {TaskStatus::ALL.into_iter().map(|s| view! {
                            <option value=s.as_str() selected=move || filters.with(|f| f.status == Some(s))>{s.label()}</option>
                        }).collect_view()}
                    </select>
                    <select class="select select-bordered" on:change=on_priority_change>
                        <option value="" selected=move || filters.with(|f| f.priority.is_none())>"All priorities"</option>
                        {TaskPriority::ALL.into_iter().map(|p| view! {
                            <option value=p.as_str() selected=move || filters.with(|f| f.priority == Some(p))>{p.label()}</option>
                        }).collect_view()}
                    </select>
                </div>

                <p class="px-6 text-sm text-base-content/60">
                    {move || stats.with(|s| format!("{} done, {} pending", s.done, s.pending()))}
                </p>

                {move || query.with(|q| q.error().map(|msg| view! {
                    <div role="alert" class="alert alert-error mx-6 my-2">
                        <AlertCircle attr:class="h-5 w-5" />
                        <span>{msg.to_string()}</span>
                    </div>
                }))}

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Title"</th>
                                <th>"Status"</th>
                                <th>"Priority"</th>
                                <th class="hidden md:table-cell">"Due"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || query.with(|q| q.is_loading())>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=is_empty>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">
                                        "No tasks found."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=rows
                                key=|t| (t.id.clone(), t.updated_at.clone())
                                children=move |task| {
                                    let for_edit = task.clone();
                                    let for_delete = task.clone();
                                    let due = task
                                        .due_date
                                        .as_deref()
                                        .and_then(format_display)
                                        .unwrap_or_else(|| "-".to_string());
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="font-bold">{task.title.clone()}</div>
                                                {task.description.clone().map(|d| view! {
                                                    <div class="text-sm opacity-60 line-clamp-1">{d}</div>
                                                })}
                                            </td>
                                            <td><span class=status_badge(task.status)>{task.status.label()}</span></td>
                                            <td><span class=priority_badge(task.priority)>{task.priority.label()}</span></td>
                                            <td class="hidden md:table-cell text-sm">{due}</td>
                                            <td>
                                                <div class="flex justify-end gap-1">
                                                    <button class="btn btn-ghost btn-sm btn-square" title="Edit"
                                                        on:click=move |_| open_edit(for_edit.clone())>
                                                        <Pencil attr:class="h-4 w-4" />
                                                    </button>
                                                    <button class="btn btn-ghost btn-sm btn-square text-error" title="Delete"
                                                        on:click=move |_| open_delete(for_delete.clone())>
                                                        <Trash2 attr:class="h-4 w-4" />
                                                    </button>
                                                </div>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>

                <div class="flex items-center justify-between p-6 pt-4">
                    <span class="text-sm text-base-content/70">
                        {move || format!("Page {} of {}", current_page(), total_pages())}
                    </span>
                    <div class="join">
                        <button class="btn btn-sm join-item" disabled=move || !has_prev()
                            on:click=move |_| go_to_page(current_page().saturating_sub(1))>
                            <ChevronLeft attr:class="h-4 w-4" /> "Previous"
                        </button>
                        <button class="btn btn-sm join-item" disabled=move || !has_next()
                            on:click=move |_| go_to_page(current_page() + 1)>
                            "Next" <ChevronRight attr:class="h-4 w-4" />
                        </button>
                    </div>
                </div>
            </div>
        </div>

        <TaskFormDialog
            open=form_open
            editing=editing
            pending=saving
            server_error=form_error
            on_submit=handle_save
        />
        <ConfirmDialog
            open=confirm_open
            title="Delete task?"
            message=delete_message
            pending=delete_pending
            on_confirm=handle_delete
        />
    }
}
