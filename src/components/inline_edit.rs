//! Inline Text Inputs
//!
//! `EditableName` renames in place on double-click; `InlineCreate` is the
//! "+" button that opens a one-field form.

use leptos::prelude::*;

/// Name label that turns into an input on double-click.
/// Enter or blur saves, Escape cancels; unchanged or blank values are dropped.
#[component]
pub fn EditableName(
    #[prop(into)] value: String,
    #[prop(into)] on_save: Callback<String>,
    #[prop(optional, into)] class: Option<String>,
) -> impl IntoView {
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(value.clone());
    let original = StoredValue::new(value);
    let class = class.unwrap_or_else(|| "item-name".to_string());

    let commit = move || {
        if !editing.get_untracked() {
            return;
        }
        set_editing.set(false);
        let name = draft.get_untracked().trim().to_string();
        if !name.is_empty() && name != original.get_value() {
            on_save.run(name);
        }
    };

    view! {
        <Show
            when=move || editing.get()
            fallback=move || {
                view! {
                    <span
                        class=class.clone()
                        on:dblclick=move |ev| {
                            ev.stop_propagation();
                            set_draft.set(original.get_value());
                            set_editing.set(true);
                        }
                    >
                        {original.get_value()}
                    </span>
                }
            }
        >
            <input
                class="inline-edit-input"
                type="text"
                autofocus=true
                prop:value=move || draft.get()
                on:input=move |ev| set_draft.set(event_target_value(&ev))
                on:keydown=move |ev| match ev.key().as_str() {
                    "Enter" => commit(),
                    "Escape" => set_editing.set(false),
                    _ => {}
                }
                on:blur=move |_| commit()
                on:click=|ev| ev.stop_propagation()
            />
        </Show>
    }
}

/// "+" button that expands into a single-input form
#[component]
pub fn InlineCreate(
    #[prop(into)] placeholder: String,
    #[prop(into)] on_create: Callback<String>,
    #[prop(optional, into)] label: Option<String>,
) -> impl IntoView {
    let (open, set_open) = signal(false);
    let (text, set_text) = signal(String::new());
    let label = label.unwrap_or_else(|| "+".to_string());
    let placeholder = StoredValue::new(placeholder);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = text.get_untracked().trim().to_string();
        if name.is_empty() {
            return;
        }
        on_create.run(name);
        set_text.set(String::new());
        set_open.set(false);
    };

    view! {
        <Show
            when=move || open.get()
            fallback=move || {
                view! {
                    <button
                        class="inline-create-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_open.set(true);
                        }
                    >
                        {label.clone()}
                    </button>
                }
            }
        >
            <form class="inline-create-form" on:submit=submit>
                <input
                    type="text"
                    autofocus=true
                    placeholder=placeholder.get_value()
                    prop:value=move || text.get()
                    on:input=move |ev| set_text.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Escape" {
                            set_open.set(false);
                        }
                    }
                />
                <button type="submit">"✓"</button>
            </form>
        </Show>
    }
}
