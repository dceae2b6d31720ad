//! Tools View
//!
//! AI tool directory: search, tag facets, card grid and a detail modal
//! with related tools.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{Modal, SearchBox, TagFilterBar};
use crate::context::use_app_context;
use crate::detail::{related, DetailController};
use crate::filter::{self, results_summary, FilterState};
use crate::gateway::list_tools;
use crate::models::Tool;
use crate::render::{list_view, pricing_label, tool_image, ListView, ToolCard};
use crate::store::{toast_error, use_app_store};

#[component]
pub fn ToolsView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let related_limit = ctx.config.related_limit;

    let (tools, set_tools) = signal(Vec::<Tool>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(FilterState::new());
    let detail = RwSignal::new(DetailController::new());

    let reload_trigger = ctx.reload_trigger;
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let gateway = ctx.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match async move { list_tools(gateway?.as_ref()).await }.await {
                Ok(loaded) => {
                    tracing::info!("[TOOLS] loaded {} tools", loaded.len());
                    set_tools.set(loaded);
                }
                Err(e) => toast_error(&store, "加载工具失败", &e),
            }
            set_loading.set(false);
        });
    });

    let filtered = Memo::new(move |_| tools.with(|t| filter.with(|f| filter::apply(t, f))));
    let all_tags = Memo::new(move |_| tools.with(|t| filter::collect_tags(t)));
    let summary = move || {
        results_summary(
            filtered.with(Vec::len),
            tools.with(Vec::len),
            "工具",
            filter.with(FilterState::is_active),
        )
    };

    let on_open = Callback::new(move |id: String| detail.update(|d| d.open(id)));
    let on_close = Callback::new(move |_: ()| detail.update(DetailController::close));

    view! {
        <section class="tools-section">
            <div class="section-toolbar">
                <SearchBox
                    placeholder="搜索工具名称或描述..."
                    filter=filter
                />
                <span class="results-count">{summary}</span>
            </div>
            <TagFilterBar tags=all_tags filter=filter />

            {move || {
                if loading.get() {
                    return view! { <div class="loading">"加载中..."</div> }.into_any();
                }
                match filtered.with(|items| list_view(items, ToolCard::from_tool)) {
                    ListView::Empty => view! {
                        <div class="empty-state">
                            <p>"没有找到匹配的工具"</p>
                        </div>
                    }
                    .into_any(),
                    ListView::Populated(cards) => view! {
                        <div class="tools-grid">
                            {cards
                                .into_iter()
                                .map(|card| view! { <ToolCardView card=card on_open=on_open /> })
                                .collect_view()}
                        </div>
                    }
                    .into_any(),
                }
            }}

            {move || {
                let tool = detail.with(|d| tools.with(|t| d.selected(t).cloned()))?;
                let similar = tools.with(|t| related(t, &tool, related_limit));
                Some(view! {
                    <Modal on_close=on_close class="modal tool-modal">
                        <ToolDetail tool=tool related=similar on_open=on_open />
                    </Modal>
                })
            }}
        </section>
    }
}

#[component]
fn ToolCardView(card: ToolCard, on_open: Callback<String>) -> impl IntoView {
    let id = card.id.clone();

    view! {
        <div class="tool-card" class:featured=card.featured on:click=move |_| on_open.run(id.clone())>
            <img class="tool-image" src=card.image alt=card.name.clone() loading="lazy" />
            <div class="tool-info">
                <h3 class="tool-name">{card.name}</h3>
                <p class="tool-description">{card.description}</p>
                <div class="tool-tags">
                    {card.tags.into_iter().map(|tag| view! { <span class="tag">{tag}</span> }).collect_view()}
                </div>
                <div class="tool-footer">
                    <span class="tool-pricing">{card.pricing}</span>
                    <a
                        class="tool-link"
                        href=card.url
                        target="_blank"
                        rel="noopener noreferrer"
                        on:click=|ev| ev.stop_propagation()
                    >
                        "访问 →"
                    </a>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ToolDetail(tool: Tool, related: Vec<Tool>, on_open: Callback<String>) -> impl IntoView {
    let features = if tool.features.is_empty() {
        view! { <p class="empty-features">"暂无功能列表"</p> }.into_any()
    } else {
        view! {
            <ul class="feature-list">
                {tool.features.iter().map(|f| view! { <li>{f.clone()}</li> }).collect_view()}
            </ul>
        }
        .into_any()
    };

    view! {
        <div class="tool-detail">
            <div class="tool-detail-header">
                <img class="tool-detail-image" src=tool_image(&tool) alt=tool.name.clone() />
                <div>
                    <h2>{tool.name.clone()}</h2>
                    <span class="tool-pricing">{pricing_label(&tool)}</span>
                </div>
            </div>
            <p class="tool-detail-description">{tool.description.clone()}</p>
            <div class="tool-tags">
                {tool.tags.iter().map(|tag| view! { <span class="tag">{tag.clone()}</span> }).collect_view()}
            </div>
            <h3>"主要功能"</h3>
            {features}
            <a class="btn btn-primary" href=tool.url.clone() target="_blank" rel="noopener noreferrer">
                "访问官网"
            </a>
            {(!related.is_empty()).then(|| view! { <h3>"相关工具"</h3> })}
            <div class="related-tools">
                {related
                    .iter()
                    .map(|other| {
                        let id = other.id.clone();
                        view! {
                            <div class="related-tool" on:click=move |_| on_open.run(id.clone())>
                                <img src=tool_image(other) alt=other.name.clone() loading="lazy" />
                                <span>{other.name.clone()}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
