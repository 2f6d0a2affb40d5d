//! 新建 / 编辑任务对话框

mod form_state;

use crate::components::icons::AlertCircle;
use form_state::FormState;
use leptos::prelude::*;
use taskdeck_shared::validation::FieldErrors;
use taskdeck_shared::{Task, TaskPayload, TaskPriority, TaskStatus};

#[component]
pub fn TaskFormDialog(
    /// 对话框是否打开
    open: RwSignal<bool>,
    /// 正在编辑的任务，`None` 表示新建
    #[prop(into)]
    editing: Signal<Option<Task>>,
    /// 提交中
    #[prop(into)]
    pending: Signal<bool>,
    /// 服务端返回的错误
    #[prop(into)]
    server_error: Signal<Option<String>>,
    #[prop(into)] on_submit: Callback<TaskPayload>,
) -> impl IntoView {
    let state = FormState::new();
    let (errors, set_errors) = signal(FieldErrors::default());
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 打开时按模式重置或回填
    Effect::new(move |_| {
        if open.get() {
            set_errors.set(FieldErrors::default());
            match editing.get_untracked() {
                Some(task) => state.load(&task),
                None => state.reset(),
            }
        }
    });

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let handle_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match state.to_form().validate() {
            Ok(payload) => {
                set_errors.set(FieldErrors::default());
                on_submit.run(payload);
            }
            Err(errs) => set_errors.set(errs),
        }
    };

    let error = move |field: &'static str| move || errors.with(|e| e.get(field).map(str::to_string));
    let is_edit = move || editing.with(|t| t.is_some());

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || if is_edit() { "Edit task" } else { "New task" }}
                </h3>

                <form on:submit=handle_submit class="space-y-4 mt-4" novalidate>
                    {move || server_error.get().map(|msg| view! {
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <AlertCircle attr:class="h-5 w-5" />
                            <span>{msg}</span>
                        </div>
                    })}

                    <div class="form-control">
                        <label for="task_title" class="label">
                            <span class="label-text">"Title"</span>
                        </label>
                        <input id="task_title"
                            type="text"
                            placeholder="What needs to be done?"
                            on:input=move |ev| state.title.set(event_target_value(&ev))
                            prop:value=move || state.title.get()
                            class="input input-bordered w-full"
                        />
                        {move || error("title")().map(|msg| view! { <span class="label-text-alt text-error mt-1">{msg}</span> })}
                    </div>

                    <div class="form-control">
                        <label for="task_description" class="label">
                            <span class="label-text">"Description (optional)"</span>
                        </label>
                        <textarea id="task_description"
                            rows="3"
                            on:input=move |ev| state.description.set(event_target_value(&ev))
                            prop:value=move || state.description.get()
                            class="textarea textarea-bordered w-full"
                        ></textarea>
                        {move || error("description")().map(|msg| view! { <span class="label-text-alt text-error mt-1">{msg}</span> })}
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Status"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| state.status.set(event_target_value(&ev))
                            >
                                {TaskStatus::ALL.into_iter().map(|s| view! {
                                    <option value=s.as_str() selected=move || state.status.get() == s.as_str()>{s.label()}</option>
                                }).collect_view()}
                            </select>
                            {move || error("status")().map(|msg| view! { <span class="label-text-alt text-error mt-1">{msg}</span> })}
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Priority"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| state.priority.set(event_target_value(&ev))
                            >
                                {TaskPriority::ALL.into_iter().map(|p| view! {
                                    <option value=p.as_str() selected=move || state.priority.get() == p.as_str()>{p.label()}</option>
                                }).collect_view()}
                            </select>
                            {move || error("priority")().map(|msg| view! { <span class="label-text-alt text-error mt-1">{msg}</span> })}
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="task_due" class="label">
                            <span class="label-text">"Due date (optional)"</span>
                        </label>
                        <input id="task_due"
                            type="date"
                            on:input=move |ev| state.due_date.set(event_target_value(&ev))
                            prop:value=move || state.due_date.get()
                            class="input input-bordered w-full"
                        />
                        {move || error("due_date")().map(|msg| view! { <span class="label-text-alt text-error mt-1">{msg}</span> })}
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                        <button type="submit" disabled=move || pending.get() class="btn btn-primary">
                            {move || if pending.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else if is_edit() {
                                "Save changes".into_any()
                            } else {
                                "Create task".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
