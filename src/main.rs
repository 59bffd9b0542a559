//! TaskHub Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod deadline;
mod format;
mod markdown;
mod models;
mod query;
mod realtime;
mod session;
mod sidebar_order;
mod store;
mod toast;
mod tree;

use app::App;
use leptos::prelude::*;

use crate::config::config;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_logger::init_logger("TaskHub", config().log_capacity) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }
    mount_to_body(App);
}
