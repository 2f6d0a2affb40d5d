use crate::auth::{signup, use_auth};
use crate::components::icons::{AlertCircle, ListChecks};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_navigate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use taskdeck_shared::validation::{FieldErrors, SignupForm};

const SIGNUP_NOTICE: &str = "Account created successfully. Please sign in.";

/// 带校验提示的输入框
#[component]
fn Field(
    id: &'static str,
    label: &'static str,
    input_type: &'static str,
    placeholder: &'static str,
    value: RwSignal<String>,
    errors: ReadSignal<FieldErrors>,
) -> impl IntoView {
    let error = move || errors.with(|e| e.get(id).map(str::to_string));

    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=input_type
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class=move || if error().is_some() { "input input-bordered input-error" } else { "input input-bordered" }
            />
            {move || error().map(|msg| view! {
                <span class="label-text-alt text-error mt-1">{msg}</span>
            })}
        </div>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (field_errors, set_field_errors) = signal(FieldErrors::default());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        let form = SignupForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        let data = match form.validate() {
            Ok(data) => data,
            Err(errors) => {
                set_field_errors.set(errors);
                return;
            }
        };

        set_field_errors.set(FieldErrors::default());
        set_error_msg.set(None);
        set_is_submitting.set(true);

        spawn_local(async move {
            match signup(&auth, data).await {
                Ok(_) => {
                    auth.notice.set(Some(SIGNUP_NOTICE.to_string()));
                    navigate(AppRoute::Login.to_path());
                }
                Err(e) => {
                    log_warn!("[Signup] Registration failed: {}", e);
                    set_error_msg.set(Some(e.user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ListChecks attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Create an account"</h1>
                        <p class="text-base-content/70">"Start organizing your work"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <AlertCircle attr:class="h-5 w-5" />
                                <span>{msg}</span>
                            </div>
                        })}

                        <Field id="name" label="Name" input_type="text" placeholder="Ann Smith" value=name errors=field_errors />
                        <Field id="email" label="Email" input_type="email" placeholder="you@example.com" value=email errors=field_errors />
                        <Field id="password" label="Password" input_type="password" placeholder="••••••••" value=password errors=field_errors />
                        <Field id="confirm_password" label="Confirm password" input_type="password" placeholder="••••••••" value=confirm_password errors=field_errors />

                        <div class="form-control mt-6">
                            <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Sign up".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm text-base-content/70">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">
                                "Sign in"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
