//! Clear Filters Button Component

use leptos::prelude::*;

use crate::filter::FilterState;

/// Resets search text, tags and status facet in one click.
///
/// Hidden while the filter is already the identity.
#[component]
pub fn ClearFiltersButton(filter: RwSignal<FilterState>) -> impl IntoView {
    view! {
        <Show when=move || filter.with(FilterState::is_active)>
            <button class="btn btn-link clear-filters" on:click=move |_| filter.update(FilterState::clear)>
                "清除筛选"
            </button>
        </Show>
    }
}
