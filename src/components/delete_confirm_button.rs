//! Delete Confirm Button Component
//!
//! Two-step delete used by sidebar rows, tasks, statuses and trash entries.

use leptos::prelude::*;

const DEFAULT_PROMPT: &str = "Silinsin?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    Delete,
    Yes,
    No,
}

/// Next stage, and whether the delete should run now
fn advance(stage: Stage, press: Press) -> (Stage, bool) {
    match (stage, press) {
        (Stage::Idle, Press::Delete) => (Stage::Armed, false),
        (Stage::Armed, Press::Yes) => (Stage::Idle, true),
        (Stage::Armed, Press::No) => (Stage::Idle, false),
        (stage, _) => (stage, false),
    }
}

/// × that asks before deleting. `prompt` falls back to "Silinsin?".
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(optional, into)] prompt: Option<String>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let stage = RwSignal::new(Stage::Idle);
    let prompt = StoredValue::new(prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()));
    let button_class = StoredValue::new(button_class);

    let press = move |ev: leptos::ev::MouseEvent, press: Press| {
        ev.stop_propagation();
        let (next, fire) = advance(stage.get_untracked(), press);
        stage.set(next);
        if fire {
            on_confirm.run(());
        }
    };

    move || match stage.get() {
        Stage::Idle => view! {
            <button
                class=button_class.get_value()
                title="Sil"
                on:click=move |ev| press(ev, Press::Delete)
            >
                "×"
            </button>
        }
        .into_any(),
        Stage::Armed => view! {
            <span class="delete-confirm">
                <span class="delete-confirm-text">{prompt.get_value()}</span>
                <button class="confirm-btn" on:click=move |ev| press(ev, Press::Yes)>"✓"</button>
                <button class="cancel-btn" on:click=move |ev| press(ev, Press::No)>"✗"</button>
            </span>
        }
        .into_any(),
    }
}
