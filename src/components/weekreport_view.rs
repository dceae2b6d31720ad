//! Weekly Report View
//!
//! Video feed: thumbnail cards, then a detail page with the embedded
//! player and the report notes.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::SearchBox;
use crate::context::use_app_context;
use crate::detail::DetailController;
use crate::filter::{self, FilterState};
use crate::gateway::list_weekreports;
use crate::markdown::render_markdown;
use crate::media;
use crate::models::WeekReport;
use crate::render::{format_date_cn, list_view, local_date, ListView, WeekReportCard};

#[component]
pub fn WeekReportView() -> impl IntoView {
    let ctx = use_app_context();

    let (reports, set_reports) = signal(Vec::<WeekReport>::new());
    let (loading, set_loading) = signal(true);
    let (failed, set_failed) = signal(false);
    let filter = RwSignal::new(FilterState::new());
    let detail = RwSignal::new(DetailController::new());

    let reload_trigger = ctx.reload_trigger;
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let gateway = ctx.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match async move { list_weekreports(gateway?.as_ref()).await }.await {
                Ok(loaded) => {
                    tracing::info!("[WEEKREPORT] loaded {} reports", loaded.len());
                    set_failed.set(false);
                    set_reports.set(loaded);
                }
                Err(e) => {
                    tracing::error!("[WEEKREPORT] load failed: {}", e);
                    set_failed.set(true);
                }
            }
            set_loading.set(false);
        });
    });

    let filtered = Memo::new(move |_| reports.with(|r| filter.with(|f| filter::apply(r, f))));
    let on_open = Callback::new(move |id: String| detail.update(|d| d.open(id)));

    view! {
        <section class="weekreport-section">
            <Show
                when=move || detail.with(DetailController::is_open)
                fallback=move || view! {
                    <div class="weekreport-list-view">
                        <div class="section-toolbar">
                            <SearchBox
                                placeholder="搜索周报标题..."
                                filter=filter
                            />
                        </div>
                        {move || {
                            if loading.get() {
                                return view! { <div class="loading">"加载中..."</div> }.into_any();
                            }
                            if failed.get() {
                                return view! {
                                    <div class="weekreport-empty">
                                        <h3>"加载失败"</h3>
                                        <p>"请刷新页面重试"</p>
                                    </div>
                                }
                                .into_any();
                            }
                            match filtered.with(|items| list_view(items, WeekReportCard::from_report)) {
                                ListView::Empty => view! {
                                    <div class="weekreport-empty">
                                        <h3>"暂无周报"</h3>
                                    </div>
                                }
                                .into_any(),
                                ListView::Populated(cards) => view! {
                                    <div class="weekreport-list">
                                        {cards
                                            .into_iter()
                                            .map(|card| view! { <WeekReportCardView card=card on_open=on_open /> })
                                            .collect_view()}
                                    </div>
                                }
                                .into_any(),
                            }
                        }}
                    </div>
                }
            >
                <div class="weekreport-detail-view">
                    <button
                        class="btn btn-secondary back-btn"
                        on:click=move |_| detail.update(DetailController::close)
                    >
                        "← 返回列表"
                    </button>
                    {move || {
                        detail
                            .with(|d| reports.with(|r| d.selected(r).cloned()))
                            .map(|report| view! { <WeekReportDetail report=report /> })
                    }}
                </div>
            </Show>
        </section>
    }
}

#[component]
fn WeekReportCardView(card: WeekReportCard, on_open: Callback<String>) -> impl IntoView {
    let id = card.id.clone();
    let thumbnail_style = card
        .thumbnail
        .map(|url| format!("background-image: url('{}'); background-size: cover; background-position: center;", url))
        .unwrap_or_default();

    view! {
        <article class="weekreport-card" on:click=move |_| on_open.run(id.clone())>
            <div class="weekreport-card-thumbnail" style=thumbnail_style>
                <div class="weekreport-card-play-icon">"▶"</div>
            </div>
            <div class="weekreport-card-content">
                <h3 class="weekreport-card-title">{card.title}</h3>
                <div class="weekreport-card-date">{card.date}</div>
            </div>
        </article>
    }
}

#[component]
fn WeekReportDetail(report: WeekReport) -> impl IntoView {
    let embed = media::embed_url(&report.video_url);
    let notes = report
        .content_md
        .as_deref()
        .filter(|md| !md.trim().is_empty())
        .map(render_markdown);

    view! {
        <article class="weekreport-detail">
            <h1 class="weekreport-detail-title">{report.title.clone()}</h1>
            <div class="weekreport-detail-date">{format_date_cn(local_date(report.published_at))}</div>
            <div class="weekreport-video-container">
                <iframe
                    class="weekreport-video"
                    src=embed
                    allowfullscreen=true
                    allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                    {..leptos::attr::loading("lazy")}
                ></iframe>
            </div>
            {notes.map(|html| view! { <div class="markdown-body" inner_html=html></div> })}
        </article>
    }
}
