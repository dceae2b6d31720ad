//! Section Tab Bar Component
//!
//! Tab bar for switching between the four content sections.

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields, Section};

/// Section Tab Bar component
///
/// Writes the chosen section to the store and mirrors it in the URL hash
/// so a reload lands on the same tab.
#[component]
pub fn SectionTabBar(#[prop(optional)] admin: bool) -> impl IntoView {
    let store = use_app_store();

    let select = move |section: Section| {
        store.section().set(section);
        if admin {
            return;
        }
        if let Some(location) = web_sys::window().map(|w| w.location()) {
            if let Err(e) = location.set_hash(section.hash()) {
                tracing::debug!("[TABS] could not update hash: {:?}", e);
            }
        }
    };

    view! {
        <nav class="section-tab-bar">
            {Section::ALL
                .into_iter()
                .map(|section| {
                    let tab_class = move || {
                        if store.section().get() == section { "nav-tab active" } else { "nav-tab" }
                    };
                    view! {
                        <button class=tab_class on:click=move |_| select(section)>
                            {section.label()}
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
