//! Admin Weekly Reports Panel
//!
//! Report table plus an add/edit modal with a live video preview.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{Action, Outcome, Target};
use crate::admin::{run_action, EditMode};
use crate::components::{field_error, DeleteConfirmButton, FormField, Modal};
use crate::context::use_app_context;
use crate::error::FarmError;
use crate::filter::{self, FilterState};
use crate::gateway::{create_weekreport, list_weekreports, update_weekreport};
use crate::media;
use crate::models::WeekReport;
use crate::render::{format_date_slash, list_view, local_date, ListView};
use crate::store::{toast_error, toast_success, use_app_store};
use crate::validation::WeekReportForm;

#[component]
pub fn AdminWeekReportsPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (reports, set_reports) = signal(Vec::<WeekReport>::new());
    let (loading, set_loading) = signal(true);
    let editing = RwSignal::new(None::<EditMode>);
    let form = RwSignal::new(WeekReportForm::default());
    let (errors, set_errors) = signal::<Option<FarmError>>(None);

    let reload_trigger = ctx.reload_trigger;
    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let gateway = load_ctx.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match async move { list_weekreports(gateway?.as_ref()).await }.await {
                Ok(loaded) => {
                    tracing::info!("[ADMIN] loaded {} weekly reports", loaded.len());
                    set_reports.set(loaded);
                }
                Err(e) => toast_error(&store, "加载周报失败", &e),
            }
            set_loading.set(false);
        });
    });

    let listed = Memo::new(move |_| reports.with(|r| filter::apply(r, &FilterState::new())));

    let open_create = move |_| {
        form.set(WeekReportForm::new(Utc::now()));
        set_errors.set(None);
        editing.set(Some(EditMode::Create));
    };
    let close = Callback::new(move |_: ()| editing.set(None));

    let action_ctx = ctx.clone();
    let act = Callback::new(move |(action, target): (Action, Target)| {
        run_action(&action_ctx, store, action, target, reports.get_untracked(), move |outcome| match outcome {
            Outcome::Updated(next) => set_reports.set(next),
            Outcome::Edit(report) => {
                form.set(WeekReportForm::from_report(&report));
                set_errors.set(None);
                editing.set(Some(EditMode::Update(report.id)));
            }
            Outcome::Ignored => {}
        });
    });

    let on_save = Callback::new(move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(mode) = editing.get_untracked() else {
            return;
        };
        let draft = match form.with_untracked(|f| f.validate(Utc::now())) {
            Ok(draft) => draft,
            Err(e) => return set_errors.set(Some(e)),
        };
        set_errors.set(None);
        let gateway = match ctx.gateway() {
            Ok(gateway) => gateway,
            Err(e) => return toast_error(&store, "保存失败", &e),
        };
        let ctx = ctx.clone();
        spawn_local(async move {
            let saved = match &mode {
                EditMode::Create => create_weekreport(gateway.as_ref(), &draft).await.map(|_| ()),
                EditMode::Update(id) => update_weekreport(gateway.as_ref(), id, &draft).await,
            };
            match saved {
                Ok(()) => {
                    let message = match mode {
                        EditMode::Create => "周报已添加",
                        EditMode::Update(_) => "周报已更新",
                    };
                    toast_success(&store, message);
                    editing.set(None);
                    ctx.reload();
                }
                Err(e) => toast_error(&store, "保存失败", &e),
            }
        });
    });

    let preview = move || {
        let url = form.with(|f| f.video_url.trim().to_string());
        (!url.is_empty()).then(|| media::embed_url(&url))
    };

    view! {
        <div class="admin-panel weekreports-panel">
            <div class="panel-header">
                <h2>"周报管理"</h2>
                <span class="panel-count">{move || format!("共 {} 期周报", reports.with(Vec::len))}</span>
                <button class="btn btn-primary" on:click=open_create>"+ 添加周报"</button>
            </div>

            {move || {
                if loading.get() {
                    return view! { <div class="loading">"加载中..."</div> }.into_any();
                }
                match listed.with(|items| list_view(items, WeekReport::clone)) {
                    ListView::Empty => view! { <div class="empty-state">"暂无周报"</div> }.into_any(),
                    ListView::Populated(rows) => view! {
                        <table class="admin-table">
                            <thead>
                                <tr>
                                    <th>"标题"</th>
                                    <th>"发布时间"</th>
                                    <th>"视频"</th>
                                    <th>"操作"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|report| view! { <ReportRow report=report act=act /> }).collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                }
            }}

            {move || {
                let mode = editing.get()?;
                Some(view! {
                    <Modal on_close=close class="modal modal-wide">
                        <h2>{mode.title("周报")}</h2>
                        <form class="admin-form" on:submit=move |ev| on_save.run(ev)>
                            <FormField label="标题 *" error=field_error(errors, "title")>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.title.clone())
                                    on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="视频链接 *" error=field_error(errors, "video_url")>
                                <input
                                    type="url"
                                    placeholder="YouTube 或 Bilibili 链接"
                                    prop:value=move || form.with(|f| f.video_url.clone())
                                    on:input=move |ev| form.update(|f| f.video_url = event_target_value(&ev))
                                />
                            </FormField>
                            {move || preview().map(|src| view! {
                                <div class="video-preview">
                                    <iframe src=src allowfullscreen=true></iframe>
                                </div>
                            })}
                            <FormField label="发布时间" error=field_error(errors, "published_at")>
                                <input
                                    type="datetime-local"
                                    prop:value=move || form.with(|f| f.published_at.clone())
                                    on:input=move |ev| form.update(|f| f.published_at = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="周报内容（Markdown）" error=field_error(errors, "content_md")>
                                <textarea
                                    rows="10"
                                    class="markdown-input"
                                    prop:value=move || form.with(|f| f.content_md.clone())
                                    on:input=move |ev| form.update(|f| f.content_md = event_target_value(&ev))
                                ></textarea>
                            </FormField>
                            <div class="form-actions">
                                <button type="button" class="btn btn-secondary" on:click=move |_| close.run(())>
                                    "取消"
                                </button>
                                <button type="submit" class="btn btn-primary">"保存"</button>
                            </div>
                        </form>
                    </Modal>
                })
            }}
        </div>
    }
}

#[component]
fn ReportRow(report: WeekReport, act: Callback<(Action, Target)>) -> impl IntoView {
    let edit_target = Target::One(report.id.clone());
    let delete_target = Target::One(report.id.clone());

    view! {
        <tr>
            <td>{report.title.clone()}</td>
            <td>{format_date_slash(local_date(report.published_at))}</td>
            <td>
                <a href=report.video_url.clone() target="_blank" rel="noopener noreferrer">"查看"</a>
            </td>
            <td class="cell-actions">
                <button class="btn btn-sm" on:click=move |_| act.run((Action::Edit, edit_target.clone()))>
                    "编辑"
                </button>
                <DeleteConfirmButton on_confirm=move |_| act.run((Action::Delete, delete_target.clone())) />
            </td>
        </tr>
    }
}
