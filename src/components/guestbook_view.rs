//! Guestbook View
//!
//! Submission form with a live character counter, then one page of
//! approved messages with sort, pagination and likes.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::actions::{Action, Target};
use crate::components::Pagination;
use crate::context::use_app_context;
use crate::error::{FarmError, FarmResult};
use crate::filter::{self, FilterState};
use crate::gateway::{list_approved_page, submit_message, SharedGateway, SortOrder};
use crate::like::LikeFlow;
use crate::models::GuestbookMessage;
use crate::pager::{PageState, RowRange};
use crate::render::{counter_label, list_view, CounterLevel, ListView, MessageCard};
use crate::storage::LocalLikeStore;
use crate::store::{toast_error, toast_success, use_app_store};
use crate::validation::GuestbookForm;

#[component]
pub fn GuestbookView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let like_store = LocalLikeStore::new(ctx.config.likes_storage_key.clone());

    let (messages, set_messages) = signal(Vec::<GuestbookMessage>::new());
    let (loading, set_loading) = signal(true);
    let (sort, set_sort) = signal(SortOrder::Newest);
    let pager = RwSignal::new(PageState::new(ctx.config.page_size));
    let likes = RwSignal::new(LikeFlow::from_store(&like_store));
    let list_ref = NodeRef::<leptos::html::Section>::new();

    let gateway = StoredValue::new(ctx.gateway());
    let actions = StoredValue::new(ctx.actions());

    let fetch_page = move |range: RowRange| {
        let gateway = gateway.get_value();
        let sort = sort.get_untracked();
        set_loading.set(true);
        spawn_local(async move {
            match async move { list_approved_page(gateway?.as_ref(), sort, range).await }.await {
                Ok(page) => {
                    let total = page.total_or_len();
                    tracing::info!("[GUESTBOOK] loaded {} of {}", page.rows.len(), total);
                    pager.update(|p| p.set_total(total));
                    set_messages.set(page.rows);
                }
                Err(e) => toast_error(&store, "加载留言失败，请刷新重试", &e),
            }
            set_loading.set(false);
        });
    };

    let reload_trigger = ctx.reload_trigger;
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        fetch_page(pager.with_untracked(PageState::current_range));
    });

    let on_navigate = Callback::new(move |page: u32| {
        let Some(range) = pager.try_update(|p| p.navigate(page)).flatten() else {
            return;
        };
        fetch_page(range);
        scroll_into_view(list_ref);
    });

    let on_sort = move |value: String| {
        let next = SortOrder::parse(&value);
        if next == sort.get_untracked() {
            return;
        }
        set_sort.set(next);
        if let Some(range) = pager.try_update(PageState::reset) {
            fetch_page(range);
        }
    };

    let on_like = Callback::new(move |(id, stored): (String, i64)| {
        let Some(tentative) = likes.try_update(|flow| flow.begin(&id, stored)).flatten() else {
            return;
        };
        let actions = actions.get_value();
        let snapshot = messages.get_untracked();
        let like_store = like_store.clone();
        spawn_local(async move {
            let target = Target::One(tentative.id.clone());
            let outcome = match actions {
                Ok(registry) => registry
                    .dispatch(Action::Like, &target, &snapshot)
                    .await
                    .map(|_| ()),
                Err(e) => Err(e),
            };
            match likes.try_update(|flow| flow.finish(tentative, outcome, &like_store)) {
                Some(Ok(commit)) => set_messages.update(|rows| {
                    *rows = rows
                        .iter()
                        .map(|m| {
                            let mut m = m.clone();
                            if m.id == commit.id {
                                m.likes_count = Some(commit.count);
                            }
                            m
                        })
                        .collect();
                }),
                Some(Err(rollback)) => toast_error(&store, "点赞失败，请重试", &rollback.error),
                None => {}
            }
        });
    });

    // Public rows are already approved, the pass keeps every list on the filter path
    let shown = Memo::new(move |_| messages.with(|m| filter::apply(m, &FilterState::new())));

    view! {
        <div class="guestbook-page">
            <GuestbookFormView gateway=gateway.get_value() />

            <section class="messages-section" node_ref=list_ref>
                <div class="messages-header">
                    <h2>
                        "留言墙 "
                        <span class="message-count">{move || pager.with(PageState::total_count)}</span>
                    </h2>
                    <select
                        class="sort-select"
                        prop:value=move || sort.get().as_str()
                        on:change=move |ev| on_sort(event_target_value(&ev))
                    >
                        {[SortOrder::Newest, SortOrder::Popular]
                            .into_iter()
                            .map(|order| view! { <option value=order.as_str()>{order.label()}</option> })
                            .collect_view()}
                    </select>
                </div>

                {move || {
                    if loading.get() {
                        return view! { <div class="messages-loading">"加载中..."</div> }.into_any();
                    }
                    let now = Utc::now();
                    let cards = shown.with(|rows| {
                        likes.with(|flow| list_view(rows, |m| MessageCard::from_message(m, flow.is_liked(&m.id), now)))
                    });
                    match cards {
                        ListView::Empty => view! {
                            <div class="messages-empty">
                                <p>"还没有留言，来做第一个留言的人吧！"</p>
                            </div>
                        }
                        .into_any(),
                        ListView::Populated(cards) => view! {
                            <div class="messages-grid">
                                {cards
                                    .into_iter()
                                    .map(|card| view! { <MessageCardView card=card likes=likes on_like=on_like /> })
                                    .collect_view()}
                            </div>
                        }
                        .into_any(),
                    }
                }}

                <Pagination pager=pager on_navigate=on_navigate />
            </section>
        </div>
    }
}

#[component]
fn MessageCardView(
    card: MessageCard,
    likes: RwSignal<LikeFlow>,
    on_like: Callback<(String, i64)>,
) -> impl IntoView {
    let stored = card.likes;
    let id_count = card.id.clone();
    let id_disabled = card.id.clone();
    let id_liked = card.id.clone();
    let id_click = card.id.clone();

    view! {
        <div class="message-card" class:featured=card.featured>
            {card.featured.then(|| view! { <span class="featured-badge">"⭐ 精选"</span> })}
            <div class="message-header">
                <div class="message-avatar">{card.avatar}</div>
                <div class="message-meta">
                    <span class="message-author">{card.author}</span>
                    <span class="message-time">{card.time}</span>
                </div>
            </div>
            <p class="message-content">{card.content}</p>
            <div class="message-footer">
                <button
                    class="like-btn"
                    class:liked=move || likes.with(|f| f.is_liked(&id_liked) || f.is_pending(&id_liked))
                    disabled=move || likes.with(|f| f.is_disabled(&id_disabled))
                    on:click=move |_| on_like.run((id_click.clone(), stored))
                >
                    "❤ "
                    <span>{move || likes.with(|f| f.display_count(&id_count, stored))}</span>
                </button>
            </div>
        </div>
    }
}

#[component]
fn GuestbookFormView(gateway: FarmResult<SharedGateway>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let config = ctx.config.clone();
    let max = config.max_content_length;

    let (author, set_author) = signal(String::new());
    let (content, set_content) = signal(String::new());
    let (errors, set_errors) = signal::<Option<FarmError>>(None);
    let (submitting, set_submitting) = signal(false);
    let gateway = StoredValue::new(gateway);

    let length = move || content.with(|c| c.chars().count());
    let counter_class = move || format!("char-counter {}", CounterLevel::for_length(length(), max).class());
    let field_error = move |field: &'static str| {
        move || errors.with(|e| e.as_ref().and_then(|e| e.field_message(field)).map(str::to_string))
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = GuestbookForm {
            author: author.get_untracked(),
            content: content.get_untracked(),
        };
        let message = match form.validate(&config) {
            Ok(message) => message,
            Err(e) => {
                set_errors.set(Some(e));
                return;
            }
        };
        set_errors.set(None);
        set_submitting.set(true);

        let gateway = gateway.get_value();
        spawn_local(async move {
            match async move { submit_message(gateway?.as_ref(), &message).await }.await {
                Ok(()) => {
                    tracing::info!("[GUESTBOOK] message submitted for review");
                    toast_success(&store, "留言已提交，审核后将显示！");
                    set_author.set(String::new());
                    set_content.set(String::new());
                }
                Err(e) => toast_error(&store, "提交失败，请稍后重试", &e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <form class="guestbook-form" on:submit=on_submit>
            <div class="form-group">
                <label for="author">"姓名"</label>
                <input
                    id="author"
                    type="text"
                    maxlength="50"
                    placeholder="你的名字"
                    prop:value=move || author.get()
                    on:input=move |ev| set_author.set(event_target_value(&ev))
                />
                <span class="error-message">{field_error("author")}</span>
            </div>
            <div class="form-group">
                <label for="content">"留言"</label>
                <textarea
                    id="content"
                    rows="4"
                    maxlength=max.to_string()
                    placeholder="说点什么吧..."
                    prop:value=move || content.get()
                    on:input=move |ev| set_content.set(event_target_value(&ev))
                ></textarea>
                <div class="char-bar">
                    <div
                        class=move || format!("char-bar-fill {}", CounterLevel::for_length(length(), max).class())
                        style:width=move || format!("{}%", (length() * 100 / max.max(1)).min(100))
                    ></div>
                </div>
                <span class=counter_class>{move || counter_label(length(), max)}</span>
                <span class="error-message">{field_error("content")}</span>
            </div>
            <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                {move || if submitting.get() { "提交中..." } else { "提交留言" }}
            </button>
        </form>
    }
}

fn scroll_into_view(target: NodeRef<leptos::html::Section>) {
    let Some(section) = target.get_untracked() else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    section.scroll_into_view_with_scroll_into_view_options(&options);
}
