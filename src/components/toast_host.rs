//! Toast Host Component
//!
//! Fixed corner stack for the toast queue in `AppContext`.

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    view! {
        <div class="toast-host">
            <For
                each=move || ctx.toasts()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast {}", toast.kind.class()) on:click=move |_| ctx.dismiss_toast(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
