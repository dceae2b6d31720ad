//! Admin Tools Panel
//!
//! Tool table with search, an add/edit modal and delete confirmation.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{Action, Outcome, Target};
use crate::admin::{run_action, EditMode};
use crate::components::{field_error, DeleteConfirmButton, FormField, Modal, SearchBox};
use crate::context::use_app_context;
use crate::error::FarmError;
use crate::filter::{self, FilterState};
use crate::gateway::{create_tool, list_tools_admin, update_tool};
use crate::models::Tool;
use crate::render::{list_view, pricing_label, tool_image, ListView};
use crate::store::{toast_error, toast_success, use_app_store};
use crate::validation::ToolForm;

#[component]
pub fn AdminToolsPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (tools, set_tools) = signal(Vec::<Tool>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(FilterState::new());
    let editing = RwSignal::new(None::<EditMode>);
    let form = RwSignal::new(ToolForm::default());
    let (errors, set_errors) = signal::<Option<FarmError>>(None);

    let reload_trigger = ctx.reload_trigger;
    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let gateway = load_ctx.gateway();
        set_loading.set(true);
        spawn_local(async move {
            match async move { list_tools_admin(gateway?.as_ref()).await }.await {
                Ok(loaded) => {
                    tracing::info!("[ADMIN] loaded {} tools", loaded.len());
                    set_tools.set(loaded);
                }
                Err(e) => toast_error(&store, "加载工具失败", &e),
            }
            set_loading.set(false);
        });
    });

    let filtered = Memo::new(move |_| tools.with(|t| filter.with(|f| filter::apply(t, f))));

    let open_create = move |_| {
        form.set(ToolForm::default());
        set_errors.set(None);
        editing.set(Some(EditMode::Create));
    };
    let close = Callback::new(move |_: ()| editing.set(None));

    let action_ctx = ctx.clone();
    let act = Callback::new(move |(action, target): (Action, Target)| {
        run_action(&action_ctx, store, action, target, tools.get_untracked(), move |outcome| match outcome {
            Outcome::Updated(next) => set_tools.set(next),
            Outcome::Edit(tool) => {
                form.set(ToolForm::from_tool(&tool));
                set_errors.set(None);
                editing.set(Some(EditMode::Update(tool.id)));
            }
            Outcome::Ignored => {}
        });
    });

    let on_save = Callback::new(move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(mode) = editing.get_untracked() else {
            return;
        };
        let draft = match form.with_untracked(ToolForm::validate) {
            Ok(draft) => draft,
            Err(e) => return set_errors.set(Some(e)),
        };
        set_errors.set(None);
        let gateway = match ctx.gateway() {
            Ok(gateway) => gateway,
            Err(e) => return toast_error(&store, "操作失败", &e),
        };
        let ctx = ctx.clone();
        spawn_local(async move {
            let saved = match &mode {
                EditMode::Create => create_tool(gateway.as_ref(), &draft).await.map(|_| ()),
                EditMode::Update(id) => update_tool(gateway.as_ref(), id, &draft).await,
            };
            match saved {
                Ok(()) => {
                    toast_success(&store, format!("{}！", mode.saved_message("工具")));
                    editing.set(None);
                    ctx.reload();
                }
                Err(e) => toast_error(&store, "操作失败", &e),
            }
        });
    });

    view! {
        <div class="admin-panel tools-panel">
            <div class="panel-header">
                <h2>"工具管理"</h2>
                <span class="panel-count">{move || format!("共 {} 个工具", tools.with(Vec::len))}</span>
                <button class="btn btn-primary" on:click=open_create>"+ 添加工具"</button>
            </div>
            <div class="panel-toolbar">
                <SearchBox
                    placeholder="搜索工具名称或描述..."
                    filter=filter
                />
            </div>

            {move || {
                if loading.get() {
                    return view! { <div class="loading">"加载中..."</div> }.into_any();
                }
                match filtered.with(|items| list_view(items, Tool::clone)) {
                    ListView::Empty => view! { <div class="empty-state">"暂无工具"</div> }.into_any(),
                    ListView::Populated(rows) => view! {
                        <table class="admin-table">
                            <thead>
                                <tr>
                                    <th>"图片"</th>
                                    <th>"名称"</th>
                                    <th>"价格"</th>
                                    <th>"标签"</th>
                                    <th>"操作"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|tool| view! { <ToolRow tool=tool act=act /> }).collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                }
            }}

            {move || {
                let mode = editing.get()?;
                Some(view! {
                    <Modal on_close=close>
                        <h2>{mode.title("工具")}</h2>
                        <form class="admin-form" on:submit=move |ev| on_save.run(ev)>
                            <FormField label="名称 *" error=field_error(errors, "name")>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.name.clone())
                                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="链接 *" error=field_error(errors, "url")>
                                <input
                                    type="url"
                                    prop:value=move || form.with(|f| f.url.clone())
                                    on:input=move |ev| form.update(|f| f.url = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="描述" error=field_error(errors, "description")>
                                <textarea
                                    rows="3"
                                    prop:value=move || form.with(|f| f.description.clone())
                                    on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                                ></textarea>
                            </FormField>
                            <FormField label="图片链接" error=field_error(errors, "image_url")>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.image_url.clone())
                                    on:input=move |ev| form.update(|f| f.image_url = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="价格" error=field_error(errors, "pricing")>
                                <input
                                    type="text"
                                    placeholder="免费 / 付费 / 免费试用"
                                    prop:value=move || form.with(|f| f.pricing.clone())
                                    on:input=move |ev| form.update(|f| f.pricing = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="标签（逗号分隔）" error=field_error(errors, "tags")>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.tags.clone())
                                    on:input=move |ev| form.update(|f| f.tags = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="主要功能（每行一个）" error=field_error(errors, "features")>
                                <textarea
                                    rows="4"
                                    prop:value=move || form.with(|f| f.features.clone())
                                    on:input=move |ev| form.update(|f| f.features = event_target_value(&ev))
                                ></textarea>
                            </FormField>
                            <label class="checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.is_featured)
                                    on:change=move |ev| form.update(|f| f.is_featured = event_target_checked(&ev))
                                />
                                "置顶推荐"
                            </label>
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
fn ToolRow(tool: Tool, act: Callback<(Action, Target)>) -> impl IntoView {
    let edit_target = Target::One(tool.id.clone());
    let delete_target = Target::One(tool.id.clone());

    view! {
        <tr>
            <td><img class="admin-thumb" src=tool_image(&tool) alt=tool.name.clone() /></td>
            <td>
                {tool.name.clone()}
                {tool.is_featured.then(|| view! { <span class="badge badge-primary">"⭐"</span> })}
            </td>
            <td>{pricing_label(&tool)}</td>
            <td>{tool.tags.join(", ")}</td>
            <td class="cell-actions">
                <button class="btn btn-sm" on:click=move |_| act.run((Action::Edit, edit_target.clone()))>
                    "编辑"
                </button>
                <DeleteConfirmButton on_confirm=move |_| act.run((Action::Delete, delete_target.clone())) />
            </td>
        </tr>
    }
}
