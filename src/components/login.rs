//! Login Form Component
//!
//! Sign-in and registration share one form; the token is stored on success.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{info, warn};

use crate::commands::auth::{self, LoginArgs, RegisterArgs};
use crate::commands::ApiError;
use crate::context::AppContext;
use crate::session;

const LOGIN_FAILED: &str = "Giriş uğursuz oldu!";

/// Missing fields are named; every server or network failure gets one message
fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Validation(message) => message.clone(),
        _ => LOGIN_FAILED.to_string(),
    }
}

#[component]
pub fn LoginForm(#[prop(into)] on_login: Callback<()>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let (registering, set_registering) = signal(false);
    let (name, set_name) = signal(String::new());
    let (surname, set_surname) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (busy, set_busy) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        let register = registering.get_untracked();
        let login_args = LoginArgs { email: email.get_untracked(), password: password.get_untracked() };
        let register_args = RegisterArgs {
            name: name.get_untracked(),
            surname: surname.get_untracked(),
            email: login_args.email.clone(),
            password: login_args.password.clone(),
        };

        spawn_local(async move {
            let result = if register {
                auth::register(&register_args).await
            } else {
                auth::login(&login_args).await
            };
            let stored = result.and_then(|response| session::save_token(&response.token));
            set_busy.set(false);
            match stored {
                Ok(()) => {
                    info!(register, "signed in");
                    set_password.set(String::new());
                    on_login.run(());
                }
                Err(e) => {
                    warn!(error = %e, "sign-in failed");
                    ctx.toast_error(login_error_message(&e));
                }
            }
        });
    };

    view! {
        <form class="login-form" on:submit=submit>
            <h1>{move || if registering.get() { "Qeydiyyat" } else { "Giriş" }}</h1>
            <Show when=move || registering.get()>
                <input
                    type="text"
                    placeholder="Ad"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Soyad"
                    prop:value=move || surname.get()
                    on:input=move |ev| set_surname.set(event_target_value(&ev))
                />
            </Show>
            <input
                type="email"
                placeholder="E-poçt"
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <input
                type="password"
                placeholder="Şifrə"
                prop:value=move || password.get()
                on:input=move |ev| set_password.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || busy.get()>
                {move || if registering.get() { "Qeydiyyatdan keç" } else { "Daxil ol" }}
            </button>
            <button type="button" class="link-btn" on:click=move |_| set_registering.update(|r| *r = !*r)>
                {move || if registering.get() { "Hesabınız var? Daxil olun" } else { "Hesabınız yoxdur? Qeydiyyatdan keçin" }}
            </button>
        </form>
    }
}
