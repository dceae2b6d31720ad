//! Pagination Component
//!
//! Prev / numbered / next controls over a `PageState`. Hidden when there is
//! a single page.

use leptos::prelude::*;

use crate::pager::{PageLabel, PageState};

#[component]
pub fn Pagination(
    #[prop(into)] pager: Signal<PageState>,
    #[prop(into)] on_navigate: Callback<u32>,
) -> impl IntoView {
    view! {
        <Show when=move || pager.with(PageState::is_visible)>
            <div class="pagination">
                <button
                    class="page-btn"
                    disabled=move || !pager.with(PageState::has_prev)
                    on:click=move |_| on_navigate.run(pager.with(|p| p.current().saturating_sub(1)))
                >
                    "上一页"
                </button>
                {move || {
                    let current = pager.with(PageState::current);
                    pager
                        .with(PageState::labels)
                        .into_iter()
                        .map(|label| match label {
                            PageLabel::Page(page) => {
                                let class = if page == current { "page-btn active" } else { "page-btn" };
                                view! {
                                    <button class=class on:click=move |_| on_navigate.run(page)>
                                        {page}
                                    </button>
                                }
                                .into_any()
                            }
                            PageLabel::Ellipsis => view! { <span class="page-ellipsis">"..."</span> }.into_any(),
                        })
                        .collect_view()
                }}
                <button
                    class="page-btn"
                    disabled=move || !pager.with(PageState::has_next)
                    on:click=move |_| on_navigate.run(pager.with(|p| p.current() + 1))
                >
                    "下一页"
                </button>
            </div>
        </Show>
    }
}
