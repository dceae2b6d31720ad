//! Tag Filter Bar Component
//!
//! One chip per tag in the loaded snapshot; clicking toggles it in the
//! view's `FilterState`. The trailing button resets the whole filter.

use leptos::prelude::*;

use crate::components::ClearFiltersButton;
use crate::filter::FilterState;

#[component]
pub fn TagFilterBar(
    #[prop(into)] tags: Signal<Vec<String>>,
    filter: RwSignal<FilterState>,
) -> impl IntoView {
    view! {
        <Show when=move || !tags.with(Vec::is_empty)>
            <div class="tag-filter-bar">
                <For
                    each=move || tags.get()
                    key=|tag| tag.clone()
                    children=move |tag| {
                        let for_class = tag.clone();
                        let for_click = tag.clone();
                        let class = move || {
                            if filter.with(|f| f.is_tag_active(&for_class)) {
                                "tag-chip active"
                            } else {
                                "tag-chip"
                            }
                        };
                        view! {
                            <button
                                class=class
                                on:click=move |_| filter.update(|f| f.toggle_tag(&for_click))
                            >
                                {tag}
                            </button>
                        }
                    }
                />
                <ClearFiltersButton filter=filter />
            </div>
        </Show>
    }
}
