//! Search Box Component
//!
//! Text input bound to a view's `FilterState` query. Keystrokes reach the
//! filter only after the configured quiet period; a newer keystroke replaces
//! the pending one. Clearing the filter elsewhere empties the input.

use leptos::prelude::*;
use leptos_debounce::use_debounced;

use crate::context::use_app_context;
use crate::filter::FilterState;

#[component]
pub fn SearchBox(
    #[prop(into)] placeholder: String,
    filter: RwSignal<FilterState>,
) -> impl IntoView {
    let ctx = use_app_context();
    let (text, set_text) = signal(String::new());

    // Timer handles are not Send, keep them in local storage
    let debounced = StoredValue::new_local(use_debounced(
        ctx.config.search_debounce_ms,
        move |query: String| filter.update(|f| f.set_query(&query)),
    ));
    let push = move |value: String| {
        set_text.set(value.clone());
        debounced.with_value(|run| run(value));
    };

    // Only fires when the applied query actually changes
    let applied = Memo::new(move |_| filter.with(|f| f.query().to_string()));
    Effect::new(move |_| {
        if applied.with(String::is_empty) && !text.with_untracked(String::is_empty) {
            push(String::new());
        }
    });

    view! {
        <div class="search-box">
            <input
                type="text"
                class="search-input"
                placeholder=placeholder
                prop:value=move || text.get()
                on:input=move |ev| push(event_target_value(&ev))
            />
            <button
                class="search-clear"
                class:hidden=move || text.with(String::is_empty)
                on:click=move |_| push(String::new())
            >
                "×"
            </button>
        </div>
    }
}
