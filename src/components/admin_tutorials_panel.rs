//! Admin Tutorials Panel
//!
//! Tutorial table in manual order with move up/down, plus the add/edit
//! modal with the content-type switch.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{Action, Outcome, Target};
use crate::admin::{run_action, EditMode};
use crate::components::{field_error, DeleteConfirmButton, FormField, Modal, SearchBox};
use crate::context::use_app_context;
use crate::error::FarmError;
use crate::filter::{self, FilterState};
use crate::gateway::{
    create_tutorial, list_tool_options, list_tutorials_admin, move_tutorial, update_tutorial,
    MoveDirection, ToolOption,
};
use crate::models::{ContentType, Tutorial};
use crate::render::{list_view, ListView};
use crate::store::{toast_error, toast_success, use_app_store};
use crate::validation::TutorialForm;

#[component]
pub fn AdminTutorialsPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (tutorials, set_tutorials) = signal(Vec::<Tutorial>::new());
    let (tool_options, set_tool_options) = signal(Vec::<ToolOption>::new());
    let (loading, set_loading) = signal(true);
    let filter = RwSignal::new(FilterState::new());
    let editing = RwSignal::new(None::<EditMode>);
    let form = RwSignal::new(TutorialForm::default());
    let (errors, set_errors) = signal::<Option<FarmError>>(None);

    let reload_trigger = ctx.reload_trigger;
    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let gateway = load_ctx.gateway();
        set_loading.set(true);
        spawn_local(async move {
            let gateway = match gateway {
                Ok(gateway) => gateway,
                Err(e) => {
                    set_loading.set(false);
                    return toast_error(&store, "加载教程失败", &e);
                }
            };
            match list_tutorials_admin(gateway.as_ref()).await {
                Ok(loaded) => {
                    tracing::info!("[ADMIN] loaded {} tutorials", loaded.len());
                    set_tutorials.set(loaded);
                }
                Err(e) => toast_error(&store, "加载教程失败", &e),
            }
            match list_tool_options(gateway.as_ref()).await {
                Ok(options) => set_tool_options.set(options),
                Err(e) => tracing::warn!("[ADMIN] tool options unavailable: {}", e),
            }
            set_loading.set(false);
        });
    });

    let filtered = Memo::new(move |_| tutorials.with(|t| filter.with(|f| filter::apply(t, f))));
    let reordering = Signal::derive(move || filter.with(FilterState::is_active));

    let open_create = move |_| {
        form.set(TutorialForm::default());
        set_errors.set(None);
        editing.set(Some(EditMode::Create));
    };
    let close = Callback::new(move |_: ()| editing.set(None));

    let action_ctx = ctx.clone();
    let act = Callback::new(move |(action, target): (Action, Target)| {
        run_action(&action_ctx, store, action, target, tutorials.get_untracked(), move |outcome| match outcome {
            Outcome::Updated(next) => set_tutorials.set(next),
            Outcome::Edit(tutorial) => {
                form.set(TutorialForm::from_tutorial(&tutorial));
                set_errors.set(None);
                editing.set(Some(EditMode::Update(tutorial.id)));
            }
            Outcome::Ignored => {}
        });
    });

    let move_ctx = ctx.clone();
    let on_move = Callback::new(move |(id, direction): (String, MoveDirection)| {
        let gateway = match move_ctx.gateway() {
            Ok(gateway) => gateway,
            Err(e) => return toast_error(&store, "更新顺序失败", &e),
        };
        let ctx = move_ctx.clone();
        let list = tutorials.get_untracked();
        spawn_local(async move {
            match move_tutorial(gateway.as_ref(), &list, &id, direction).await {
                Ok(true) => {
                    toast_success(&store, "顺序已更新");
                    ctx.reload();
                }
                Ok(false) => {}
                Err(e) => toast_error(&store, "更新顺序失败", &e),
            }
        });
    });

    let on_save = Callback::new(move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(mode) = editing.get_untracked() else {
            return;
        };
        let draft = match form.with_untracked(TutorialForm::validate) {
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
                EditMode::Create => create_tutorial(gateway.as_ref(), &draft).await.map(|_| ()),
                EditMode::Update(id) => update_tutorial(gateway.as_ref(), id, &draft).await,
            };
            match saved {
                Ok(()) => {
                    toast_success(&store, mode.saved_message("教程"));
                    editing.set(None);
                    ctx.reload();
                }
                Err(e) => toast_error(&store, "保存失败", &e),
            }
        });
    });

    view! {
        <div class="admin-panel tutorials-panel">
            <div class="panel-header">
                <h2>"教程管理"</h2>
                <span class="panel-count">{move || format!("共 {} 篇教程", tutorials.with(Vec::len))}</span>
                <button class="btn btn-primary" on:click=open_create>"+ 添加教程"</button>
            </div>
            <div class="panel-toolbar">
                <SearchBox
                    placeholder="搜索标题、摘要或作者..."
                    filter=filter
                />
            </div>

            {move || {
                if loading.get() {
                    return view! { <div class="loading">"加载中..."</div> }.into_any();
                }
                let rows = filtered.with(|items| list_view(items, Tutorial::clone));
                let last = filtered.with(Vec::len).saturating_sub(1);
                match rows {
                    ListView::Empty => view! { <div class="empty-state">"暂无教程"</div> }.into_any(),
                    ListView::Populated(rows) => view! {
                        <table class="admin-table">
                            <thead>
                                <tr>
                                    <th>"顺序"</th>
                                    <th>"标题"</th>
                                    <th>"类型"</th>
                                    <th>"作者"</th>
                                    <th>"浏览"</th>
                                    <th>"操作"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows
                                    .into_iter()
                                    .enumerate()
                                    .map(|(index, tutorial)| view! {
                                        <TutorialRow
                                            tutorial=tutorial
                                            first=index == 0
                                            last=index == last
                                            reorder_locked=reordering
                                            act=act
                                            on_move=on_move
                                        />
                                    })
                                    .collect_view()}
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
                        <h2>{mode.title("教程")}</h2>
                        <form class="admin-form" on:submit=move |ev| on_save.run(ev)>
                            <FormField label="标题 *" error=field_error(errors, "title")>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.title.clone())
                                    on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="作者 *" error=field_error(errors, "author")>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.author.clone())
                                    on:input=move |ev| form.update(|f| f.author = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="封面图片" error=field_error(errors, "cover_image")>
                                <input
                                    type="text"
                                    placeholder="留空使用默认封面"
                                    prop:value=move || form.with(|f| f.cover_image.clone())
                                    on:input=move |ev| form.update(|f| f.cover_image = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="摘要" error=field_error(errors, "summary")>
                                <textarea
                                    rows="2"
                                    prop:value=move || form.with(|f| f.summary.clone())
                                    on:input=move |ev| form.update(|f| f.summary = event_target_value(&ev))
                                ></textarea>
                            </FormField>
                            <FormField label="标签（逗号分隔）" error=field_error(errors, "tags")>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.tags.clone())
                                    on:input=move |ev| form.update(|f| f.tags = event_target_value(&ev))
                                />
                            </FormField>
                            <FormField label="关联工具" error=field_error(errors, "tool_id")>
                                <select
                                    prop:value=move || form.with(|f| f.tool_id.clone())
                                    on:change=move |ev| form.update(|f| f.tool_id = event_target_value(&ev))
                                >
                                    <option value="">"无"</option>
                                    {move || {
                                        tool_options
                                            .get()
                                            .into_iter()
                                            .map(|option| view! { <option value=option.id>{option.name}</option> })
                                            .collect_view()
                                    }}
                                </select>
                            </FormField>
                            <FormField label="内容类型" error=field_error(errors, "content_type")>
                                <select
                                    prop:value=move || form.with(|f| f.content_type.as_str())
                                    on:change=move |ev| {
                                        let content_type = ContentType::parse(&event_target_value(&ev));
                                        form.update(|f| f.set_content_type(content_type));
                                    }
                                >
                                    <option value="markdown">"Markdown 文章"</option>
                                    <option value="url">"外部链接"</option>
                                    <option value="video">"视频"</option>
                                </select>
                            </FormField>
                            <Show
                                when=move || form.with(|f| f.content_type.is_external())
                                fallback=move || view! {
                                    <FormField label="Markdown 内容 *" error=field_error(errors, "content_md")>
                                        <textarea
                                            rows="12"
                                            class="markdown-input"
                                            prop:value=move || form.with(|f| f.content_md.clone())
                                            on:input=move |ev| form.update(|f| f.content_md = event_target_value(&ev))
                                        ></textarea>
                                    </FormField>
                                }
                            >
                                <FormField label="外部链接 *" error=field_error(errors, "external_url")>
                                    <input
                                        type="url"
                                        prop:value=move || form.with(|f| f.external_url.clone())
                                        on:input=move |ev| form.update(|f| f.external_url = event_target_value(&ev))
                                    />
                                </FormField>
                            </Show>
                            <label class="checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.is_featured)
                                    on:change=move |ev| form.update(|f| f.is_featured = event_target_checked(&ev))
                                />
                                "精选教程"
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
fn TutorialRow(
    tutorial: Tutorial,
    first: bool,
    last: bool,
    /// Set while a filter narrows the list
    reorder_locked: Signal<bool>,
    act: Callback<(Action, Target)>,
    on_move: Callback<(String, MoveDirection)>,
) -> impl IntoView {
    let (up_id, down_id) = (tutorial.id.clone(), tutorial.id.clone());
    let edit_target = Target::One(tutorial.id.clone());
    let delete_target = Target::One(tutorial.id.clone());
    let type_class = format!("badge type-{}", tutorial.content_type.as_str());

    view! {
        <tr>
            <td class="cell-order">
                <button
                    class="btn btn-sm"
                    disabled=move || first || reorder_locked.get()
                    on:click=move |_| on_move.run((up_id.clone(), MoveDirection::Up))
                >
                    "↑"
                </button>
                <button
                    class="btn btn-sm"
                    disabled=move || last || reorder_locked.get()
                    on:click=move |_| on_move.run((down_id.clone(), MoveDirection::Down))
                >
                    "↓"
                </button>
            </td>
            <td>
                {tutorial.title.clone()}
                {tutorial.is_featured.then(|| view! { <span class="badge badge-primary">"⭐"</span> })}
            </td>
            <td><span class=type_class>{tutorial.content_type.label()}</span></td>
            <td>{tutorial.author.clone()}</td>
            <td>{tutorial.view_count.unwrap_or(0)}</td>
            <td class="cell-actions">
                <button class="btn btn-sm" on:click=move |_| act.run((Action::Edit, edit_target.clone()))>
                    "编辑"
                </button>
                <DeleteConfirmButton on_confirm=move |_| act.run((Action::Delete, delete_target.clone())) />
            </td>
        </tr>
    }
}
