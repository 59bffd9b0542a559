//! TaskHub App
//!
//! Provides the shared context, then lays out sidebar, main view and chat
//! behind the protected shell.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{
    use_auth, ActivityFeed, ChatPanel, NotificationBell, Protected, Sidebar, TaskTable, ToastHost, TrashView,
};
use crate::context::AppContext;
use crate::deadline::DeadlineWatcher;
use crate::realtime::{ChatSession, NotificationFeed};
use crate::store::{AppState, AppStateStoreFields, AppStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainView {
    Tasks,
    Trash,
    Activity,
}

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    let store: AppStore = Store::new(AppState::default());
    provide_context(ctx);
    provide_context(store);
    provide_context(ChatSession::new(ctx, store));
    provide_context(NotificationFeed::new(ctx));

    view! {
        <ToastHost />
        <Protected>
            <Workspace />
        </Protected>
    }
}

#[component]
fn Workspace() -> impl IntoView {
    let store = expect_context::<AppStore>();
    let auth = use_auth();
    let (active_view, set_view) = signal(MainView::Tasks);

    let user_name = move || store.current_user().with(|u| u.as_ref().map(|u| u.full_name()).unwrap_or_default());
    let tab_class = move |tab: MainView| move || if active_view.get() == tab { "tab active" } else { "tab" };

    view! {
        <DeadlineWatcher />
        <div class="app-layout">
            <Sidebar />
            <main class="main-content">
                <header class="top-bar">
                    <nav class="view-tabs">
                        <button class=tab_class(MainView::Tasks) on:click=move |_| set_view.set(MainView::Tasks)>
                            "Tapşırıqlar"
                        </button>
                        <button class=tab_class(MainView::Trash) on:click=move |_| set_view.set(MainView::Trash)>
                            "Zibil qutusu"
                        </button>
                        <button class=tab_class(MainView::Activity) on:click=move |_| set_view.set(MainView::Activity)>
                            "Fəaliyyət"
                        </button>
                    </nav>
                    <NotificationBell />
                    <span class="user-name">{user_name}</span>
                    <button class="logout-btn" on:click=move |_| auth.sign_out()>"Çıxış"</button>
                </header>
                {move || match active_view.get() {
                    MainView::Tasks => view! { <TaskTable /> }.into_any(),
                    MainView::Trash => view! { <TrashView /> }.into_any(),
                    MainView::Activity => view! { <ActivityFeed /> }.into_any(),
                }}
            </main>
            <ChatPanel />
        </div>
    }
}
