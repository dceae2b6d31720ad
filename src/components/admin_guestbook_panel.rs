//! Admin Guestbook Panel
//!
//! Moderation table: search, status facet, selection and batch
//! approve/delete over the filtered list.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{Action, Outcome, Target};
use crate::admin::run_action;
use crate::components::{ClearFiltersButton, DeleteConfirmButton, SearchBox};
use crate::context::use_app_context;
use crate::filter::{self, FilterState, StatusFacet};
use crate::gateway::list_all_messages;
use crate::models::GuestbookMessage;
use crate::render::{list_view, AdminMessageRow, ListView};
use crate::selection::SelectionSet;
use crate::store::{toast_error, use_app_store};

#[component]
pub fn AdminGuestbookPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (messages, set_messages) = signal(Vec::<GuestbookMessage>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(FilterState::new());
    let selection = RwSignal::new(SelectionSet::new());

    let reload_trigger = ctx.reload_trigger;
    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let gateway = load_ctx.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match async move { list_all_messages(gateway?.as_ref()).await }.await {
                Ok(loaded) => {
                    tracing::info!("[ADMIN] loaded {} guestbook messages", loaded.len());
                    selection.update(SelectionSet::clear);
                    set_messages.set(loaded);
                }
                Err(e) => toast_error(&store, "加载留言失败", &e),
            }
            set_loading.set(false);
        });
    });

    let filtered = Memo::new(move |_| messages.with(|m| filter.with(|f| filter::apply(m, f))));
    let header = move || {
        messages.with(|m| {
            let pending = m.iter().filter(|msg| !msg.is_approved).count();
            format!("共 {} 条留言，{} 条待审核", m.len(), pending)
        })
    };

    // Row and batch actions share one entry point
    let act = Callback::new(move |(action, target): (Action, Target)| {
        let batch = matches!(target, Target::Many(_));
        run_action(&ctx, store, action, target, messages.get_untracked(), move |outcome| {
            if let Outcome::Updated(next) = outcome {
                set_messages.set(next);
                if batch || action == Action::Delete {
                    selection.update(SelectionSet::clear);
                }
            }
        });
    });

    let batch = move |action: Action| {
        let ids = selection.with_untracked(SelectionSet::ids);
        if !ids.is_empty() {
            act.run((action, Target::Many(ids)));
        }
    };
    let nothing_selected = Signal::derive(move || selection.with(SelectionSet::is_empty));

    view! {
        <div class="admin-panel guestbook-panel">
            <div class="panel-header">
                <h2>"留言管理"</h2>
                <span class="panel-count">{header}</span>
            </div>

            <div class="panel-toolbar">
                <SearchBox
                    placeholder="搜索作者或内容..."
                    filter=filter
                />
                <select
                    class="status-filter"
                    prop:value=move || filter.with(|f| f.status.as_str())
                    on:change=move |ev| {
                        let status = StatusFacet::parse(&event_target_value(&ev));
                        filter.update(|f| f.set_status(status));
                    }
                >
                    {StatusFacet::ALL
                        .into_iter()
                        .map(|facet| view! { <option value=facet.as_str()>{facet.label()}</option> })
                        .collect_view()}
                </select>
                <ClearFiltersButton filter=filter />
            </div>

            <div class="batch-bar">
                <label class="select-all">
                    <input
                        type="checkbox"
                        prop:checked=move || filtered.with(|rows| selection.with(|s| s.all_selected(rows)))
                        on:change=move |_| filtered.with_untracked(|rows| selection.update(|s| s.toggle_all(rows)))
                    />
                    "全选"
                </label>
                <span class="selected-count">
                    {move || format!("已选择 {} 条", selection.with(SelectionSet::len))}
                </span>
                <button
                    class="btn btn-success btn-sm"
                    disabled=move || nothing_selected.get()
                    on:click=move |_| batch(Action::Approve(true))
                >
                    "批量审核"
                </button>
                <DeleteConfirmButton
                    label="批量删除"
                    disabled=nothing_selected
                    on_confirm=move |_| batch(Action::Delete)
                />
            </div>

            {move || {
                if loading.get() {
                    return view! { <div class="loading">"加载中..."</div> }.into_any();
                }
                let now = Utc::now();
                let rows = filtered.with(|items| {
                    selection.with(|s| list_view(items, |m| AdminMessageRow::from_message(m, s.contains(&m.id), now)))
                });
                match rows {
                    ListView::Empty => view! { <div class="empty-state">"没有符合条件的留言"</div> }.into_any(),
                    ListView::Populated(rows) => view! {
                        <table class="admin-table">
                            <thead>
                                <tr>
                                    <th></th>
                                    <th>"作者"</th>
                                    <th>"内容"</th>
                                    <th>"点赞"</th>
                                    <th>"状态"</th>
                                    <th>"时间"</th>
                                    <th>"操作"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows
                                    .into_iter()
                                    .map(|row| view! { <MessageRow row=row selection=selection act=act /> })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                }
            }}
        </div>
    }
}

#[component]
fn MessageRow(
    row: AdminMessageRow,
    selection: RwSignal<SelectionSet>,
    act: Callback<(Action, Target)>,
) -> impl IntoView {
    let id = row.id.clone();
    let target = move || Target::One(id.clone());
    let (t_approve, t_feature, t_delete) = (target.clone(), target.clone(), target);
    let select_id = row.id.clone();
    let approve = Action::Approve(!row.approved);
    let feature = Action::Feature(!row.featured);

    view! {
        <tr class:selected=row.selected>
            <td>
                <input
                    type="checkbox"
                    prop:checked=row.selected
                    on:change=move |_| selection.update(|s| s.toggle(&select_id))
                />
            </td>
            <td class="cell-author">{row.author}</td>
            <td class="cell-content" title=row.content>{row.preview}</td>
            <td>{row.likes}</td>
            <td>
                {row
                    .badges
                    .into_iter()
                    .map(|badge| view! { <span class=badge.class()>{badge.label()}</span> })
                    .collect_view()}
            </td>
            <td class="cell-time">{row.time}</td>
            <td class="cell-actions">
                <button class="btn btn-sm" on:click=move |_| act.run((approve, t_approve()))>
                    {approve.label()}
                </button>
                <button class="btn btn-sm" on:click=move |_| act.run((feature, t_feature()))>
                    {feature.label()}
                </button>
                <DeleteConfirmButton on_confirm=move |_| act.run((Action::Delete, t_delete())) />
            </td>
        </tr>
    }
}
