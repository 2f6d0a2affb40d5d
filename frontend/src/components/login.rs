use crate::auth::{login, use_auth};
use crate::components::icons::{AlertCircle, CheckCircle, ListChecks};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskdeck_shared::validation::{FieldErrors, LoginForm};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (field_errors, set_field_errors) = signal(FieldErrors::default());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 提示只显示一次
    let notice = auth.notice.get_untracked();
    auth.notice.set(None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let credentials = match form.validate() {
            Ok(credentials) => credentials,
            Err(errors) => {
                set_field_errors.set(errors);
                return;
            }
        };

        set_field_errors.set(FieldErrors::default());
        set_error_msg.set(None);
        set_is_submitting.set(true);

        spawn_local(async move {
            // 成功后路由服务会根据认证状态自动跳转
            if let Err(e) = login(&auth, credentials).await {
                log_warn!("[Login] Sign in failed: {}", e);
                set_error_msg.set(Some(e.user_message()));
            }
            set_is_submitting.set(false);
        });
    };

    let field_error = move |field: &'static str| {
        move || field_errors.with(|errs| errs.get(field).map(str::to_string))
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ListChecks attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Welcome back"</h1>
                        <p class="text-base-content/70">"Sign in to manage your tasks"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        {notice.map(|msg| view! {
                            <div role="status" class="alert alert-success text-sm py-2">
                                <CheckCircle attr:class="h-5 w-5" />
                                <span>{msg}</span>
                            </div>
                        })}

                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <AlertCircle attr:class="h-5 w-5" />
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                autocomplete="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class=move || if field_error("email")().is_some() { "input input-bordered input-error" } else { "input input-bordered" }
                            />
                            {move || field_error("email")().map(|msg| view! {
                                <span class="label-text-alt text-error mt-1">{msg}</span>
                            })}
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                autocomplete="current-password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class=move || if field_error("password")().is_some() { "input input-bordered input-error" } else { "input input-bordered" }
                            />
                            {move || field_error("password")().map(|msg| view! {
                                <span class="label-text-alt text-error mt-1">{msg}</span>
                            })}
                        </div>
                        <div class="form-control mt-6">
                            <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm text-base-content/70">
                            "Don't have an account? "
                            <Link to=AppRoute::Signup class="link link-primary">
                                "Sign up"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
