//! Protected Shell
//!
//! Renders its children only once the stored token resolves to a user.
//! Sign-in also opens both sockets; sign-out closes them and wipes the store.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{info, warn};

use crate::commands::{auth, ApiError, ApiResult};
use crate::models::User;
use crate::components::LoginForm;
use crate::context::AppContext;
use crate::realtime::{use_chat, use_notifications, ChatSession, NotificationFeed};
use crate::session;
use crate::store::{store_reset, use_app_store, AppStateStoreFields, AppStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Checking,
    SignedIn,
    SignedOut,
}

/// Where a verify result leaves the shell, and whether the token is dead
fn after_verify(result: &ApiResult<User>) -> (AuthState, bool) {
    match result {
        Ok(_) => (AuthState::SignedIn, false),
        Err(ApiError::Unauthorized) => (AuthState::SignedOut, true),
        Err(_) => (AuthState::SignedOut, false),
    }
}

#[derive(Clone, Copy)]
pub struct Auth {
    pub state: RwSignal<AuthState>,
    ctx: AppContext,
    store: AppStore,
    chat: ChatSession,
    feed: NotificationFeed,
}

impl Auth {
    fn new() -> Self {
        Self {
            state: RwSignal::new(AuthState::Checking),
            ctx: expect_context::<AppContext>(),
            store: use_app_store(),
            chat: use_chat(),
            feed: use_notifications(),
        }
    }

    /// Resolve the stored token; called on mount and after the login form
    pub fn check(&self) {
        let Some(token) = session::load_token() else {
            self.state.set(AuthState::SignedOut);
            return;
        };
        self.state.set(AuthState::Checking);
        let auth = *self;
        spawn_local(async move {
            let result = auth::verify().await;
            let (state, drop_token) = after_verify(&result);
            match result {
                Ok(user) => {
                    info!(user_id = user.id, "session verified");
                    auth.store.current_user().set(Some(user));
                    auth.chat.start(&token);
                    auth.feed.start(&token);
                }
                Err(ApiError::Unauthorized) => warn!("stored token rejected"),
                Err(e) => auth.ctx.report("verify session", &e),
            }
            if drop_token {
                session::clear_token();
            }
            auth.state.set(state);
        });
    }

    pub fn sign_out(&self) {
        session::clear_token();
        self.chat.stop();
        self.feed.stop();
        store_reset(&self.store);
        self.state.set(AuthState::SignedOut);
    }
}

pub fn use_auth() -> Auth {
    expect_context::<Auth>()
}

#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    let auth = Auth::new();
    provide_context(auth);
    auth.check();

    let children = StoredValue::new(children);

    move || match auth.state.get() {
        AuthState::Checking => view! { <div class="auth-checking">"Yüklənir..."</div> }.into_any(),
        AuthState::SignedOut => view! { <LoginForm on_login=move |_| auth.check() /> }.into_any(),
        AuthState::SignedIn => children.with_value(|children| children()).into_any(),
    }
}
