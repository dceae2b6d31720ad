//! AI Farm App
//!
//! Public site: header with section tabs, the active section's view and
//! the toast layer.

use leptos::prelude::*;

use crate::components::{GuestbookView, SectionTabBar, ToastHost, ToolsView, TutorialsView, WeekReportView};
use crate::store::{use_app_store, AppStateStoreFields, Section};

#[component]
pub fn App() -> impl IntoView {
    let store = use_app_store();

    // Land on the tab named in the URL hash
    if let Some(section) = web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .and_then(|hash| Section::from_hash(&hash))
    {
        store.section().set(section);
    }

    view! {
        <div class="app-layout">
            <header class="site-header">
                <h1 class="site-title">"AI Farm"</h1>
                <p class="site-subtitle">"发现好用的 AI 工具、教程与每周资讯"</p>
                <SectionTabBar />
            </header>

            <main class="main-content">
                {move || match store.section().get() {
                    Section::Tools => view! { <ToolsView /> }.into_any(),
                    Section::Tutorials => view! { <TutorialsView /> }.into_any(),
                    Section::WeekReports => view! { <WeekReportView /> }.into_any(),
                    Section::Guestbook => view! { <GuestbookView /> }.into_any(),
                }}
            </main>

            <ToastHost />
        </div>
    }
}
