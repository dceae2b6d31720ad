//! AI Farm Frontend Entry Point

mod actions;
mod admin;
mod app;
mod components;
mod config;
mod context;
mod detail;
mod error;
mod filter;
mod gateway;
mod like;
mod markdown;
mod media;
mod models;
mod pager;
mod render;
mod selection;
mod storage;
mod store;
mod validation;

use leptos::prelude::*;
use reactive_stores::Store;
use tracing::Level;

use admin::AdminApp;
use app::App;
use config::FarmConfig;
use context::AppContext;
use store::AppState;

/// `/admin`, `/admin.html` or `#admin`
fn is_admin_page() -> bool {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return false;
    };
    let path = location.pathname().unwrap_or_default();
    let path = path.trim_end_matches('/').trim_end_matches(".html");
    path.ends_with("admin") || location.hash().unwrap_or_default() == "#admin"
}

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger("ai-farm", Level::INFO) {
        web_sys::console::warn_1(&format!("logger already installed: {}", e).into());
    }

    let admin = is_admin_page();
    let config = FarmConfig::from_document();
    tracing::info!(
        "[APP] starting {} against {}",
        if admin { "admin panel" } else { "site" },
        config.supabase_url
    );
    if !config.has_backend() {
        tracing::warn!("[APP] backend not configured, lists will stay empty");
    }

    mount_to_body(move || {
        provide_context(AppContext::new(config, admin));
        provide_context(Store::new(AppState::default()));
        if admin {
            view! { <AdminApp /> }.into_any()
        } else {
            view! { <App /> }.into_any()
        }
    });
}
