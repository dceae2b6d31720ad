//! Tutorials View
//!
//! Card list with search and tag facets. Markdown tutorials open in the
//! in-page reader; links and videos open in a new tab.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{SearchBox, TagFilterBar};
use crate::context::use_app_context;
use crate::detail::{DetailController, DetailTarget};
use crate::filter::{self, results_summary, FilterState};
use crate::gateway::{get_tutorial, increment_tutorial_views, list_tutorials};
use crate::markdown::render_markdown;
use crate::models::Tutorial;
use crate::render::{format_date_cn, list_view, local_date, ListView, TutorialCard};
use crate::store::{toast_error, use_app_store};

#[component]
pub fn TutorialsView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (tutorials, set_tutorials) = signal(Vec::<Tutorial>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(FilterState::new());
    let detail = RwSignal::new(DetailController::new());
    // Fresh copy fetched when the reader opens
    let (reading, set_reading) = signal::<Option<Tutorial>>(None);

    let reload_trigger = ctx.reload_trigger;
    let list_ctx = ctx.clone();
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let gateway = list_ctx.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match async move { list_tutorials(gateway?.as_ref()).await }.await {
                Ok(loaded) => {
                    tracing::info!("[TUTORIALS] loaded {} tutorials", loaded.len());
                    set_tutorials.set(loaded);
                }
                Err(e) => toast_error(&store, "加载教程失败", &e),
            }
            set_loading.set(false);
        });
    });

    let filtered = Memo::new(move |_| tutorials.with(|t| filter.with(|f| filter::apply(t, f))));
    let all_tags = Memo::new(move |_| tutorials.with(|t| filter::collect_tags(t)));
    let summary = move || {
        results_summary(
            filtered.with(Vec::len),
            tutorials.with(Vec::len),
            "教程",
            filter.with(FilterState::is_active),
        )
    };

    let on_open = Callback::new(move |id: String| {
        let gateway = match ctx.gateway() {
            Ok(gateway) => gateway,
            Err(e) => return toast_error(&store, "加载教程详情失败", &e),
        };
        spawn_local(async move {
            let tutorial = match get_tutorial(gateway.as_ref(), &id).await {
                Ok(Some(tutorial)) => tutorial,
                Ok(None) => {
                    tracing::warn!("[TUTORIALS] tutorial {} no longer exists", id);
                    return;
                }
                Err(e) => return toast_error(&store, "加载教程详情失败", &e),
            };

            match detail.try_update(|d| d.open_tutorial(&tutorial)) {
                Some(DetailTarget::External(url)) => open_in_new_tab(&url),
                Some(DetailTarget::InPage) => {
                    set_reading.set(Some(tutorial));
                    scroll_to_top();
                    if let Err(e) = increment_tutorial_views(gateway.as_ref(), &id).await {
                        tracing::warn!("[TUTORIALS] view count not updated: {}", e);
                    }
                }
                None => {}
            }
        });
    });

    let on_back = move |_| {
        detail.update(DetailController::close);
        set_reading.set(None);
        scroll_to_top();
    };

    view! {
        <section class="tutorials-section">
            <Show
                when=move || detail.with(DetailController::is_open)
                fallback=move || view! {
                    <div class="tutorials-list-view">
                        <div class="section-toolbar">
                            <SearchBox
                                placeholder="搜索教程标题、摘要或作者..."
                                filter=filter
                            />
                            <span class="results-count">{summary}</span>
                        </div>
                        <TagFilterBar tags=all_tags filter=filter />
                        {move || {
                            if loading.get() {
                                return view! { <div class="loading">"加载中..."</div> }.into_any();
                            }
                            match filtered.with(|items| list_view(items, TutorialCard::from_tutorial)) {
                                ListView::Empty => view! {
                                    <div class="empty-state">
                                        <p>"暂无教程"</p>
                                    </div>
                                }
                                .into_any(),
                                ListView::Populated(cards) => view! {
                                    <div class="tutorials-grid">
                                        {cards
                                            .into_iter()
                                            .map(|card| view! { <TutorialCardView card=card on_open=on_open /> })
                                            .collect_view()}
                                    </div>
                                }
                                .into_any(),
                            }
                        }}
                    </div>
                }
            >
                <div class="tutorial-detail-view">
                    <button class="btn btn-secondary back-btn" on:click=on_back>"← 返回教程列表"</button>
                    {move || reading.get().map(|tutorial| view! { <TutorialReader tutorial=tutorial /> })}
                </div>
            </Show>
        </section>
    }
}

#[component]
fn TutorialCardView(card: TutorialCard, on_open: Callback<String>) -> impl IntoView {
    let id = card.id.clone();
    let type_class = format!("tutorial-type type-{}", card.type_class);

    view! {
        <div class="tutorial-card" class:featured=card.featured on:click=move |_| on_open.run(id.clone())>
            <div class="tutorial-cover">
                <img src=card.cover alt=card.title.clone() loading="lazy" />
                <span class=type_class>{card.type_label}</span>
            </div>
            <div class="tutorial-info">
                <h3 class="tutorial-title">{card.title}</h3>
                {card.summary.map(|summary| view! { <p class="tutorial-summary">{summary}</p> })}
                <div class="tutorial-tags">
                    {card.tags.into_iter().map(|tag| view! { <span class="tag">{tag}</span> }).collect_view()}
                </div>
                <div class="tutorial-meta">
                    <span class="tutorial-author">{card.author}</span>
                    {card.tool_name.map(|name| view! { <span class="tutorial-tool">{name}</span> })}
                    <span class="tutorial-date">{card.date}</span>
                </div>
            </div>
        </div>
    }
}

#[component]
fn TutorialReader(tutorial: Tutorial) -> impl IntoView {
    let body = match tutorial.content_md.as_deref().filter(|md| !md.trim().is_empty()) {
        Some(md) => view! { <div class="markdown-body" inner_html=render_markdown(md)></div> }.into_any(),
        None => {
            tracing::warn!("[TUTORIALS] tutorial {} has no content", tutorial.id);
            view! { <p class="error-message">"教程内容为空"</p> }.into_any()
        }
    };

    view! {
        <article class="tutorial-reader">
            <h1>{tutorial.title.clone()}</h1>
            <div class="tutorial-meta">
                <span class="tutorial-author">{tutorial.author.clone()}</span>
                <span class="tutorial-date">{format_date_cn(local_date(tutorial.created_at))}</span>
            </div>
            {body}
        </article>
    }
}

fn open_in_new_tab(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer") {
        tracing::warn!("[TUTORIALS] could not open {}: {:?}", url, e);
    }
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}
