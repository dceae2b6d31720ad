//! Admin Panel
//!
//! Moderation shell: connection status, section tabs and one panel per
//! collection. Every row and batch action goes through the
//! [`ActionRegistry`](crate::actions::ActionRegistry).

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{Action, Moderated, Outcome, Target};
use crate::components::{
    AdminGuestbookPanel, AdminToolsPanel, AdminTutorialsPanel, AdminWeekReportsPanel,
    LogPanel, SectionTabBar, ToastHost,
};
use crate::context::{use_app_context, AppContext};
use crate::gateway::ping;
use crate::store::{toast_error, toast_success, use_app_store, AppStateStoreFields, AppStore, Section};

/// What the editor modal is doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Update(String),
}

impl EditMode {
    pub fn title(&self, noun: &str) -> String {
        match self {
            EditMode::Create => format!("添加{}", noun),
            EditMode::Update(_) => format!("编辑{}", noun),
        }
    }

    pub fn saved_message(&self, noun: &str) -> String {
        match self {
            EditMode::Create => format!("{}添加成功", noun),
            EditMode::Update(_) => format!("{}更新成功", noun),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connection {
    Checking,
    Connected,
    Failed,
    Unconfigured,
}

impl Connection {
    fn label(&self) -> &'static str {
        match self {
            Connection::Checking => "⏳ 连接中...",
            Connection::Connected => "✅ 已连接",
            Connection::Failed => "❌ 连接失败",
            Connection::Unconfigured => "⚠️ 未配置",
        }
    }
}

/// Dispatch `action` on `target` and hand a successful outcome to `on_outcome`
pub fn run_action<T: Moderated>(
    ctx: &AppContext,
    store: AppStore,
    action: Action,
    target: Target,
    snapshot: Vec<T>,
    on_outcome: impl FnOnce(Outcome<T>) + 'static,
) {
    let registry = match ctx.actions() {
        Ok(registry) => registry,
        Err(e) => return toast_error(&store, &format!("{}失败", action.label()), &e),
    };
    spawn_local(async move {
        match registry.dispatch(action, &target, &snapshot).await {
            Ok(outcome) => {
                if matches!(outcome, Outcome::Updated(_)) {
                    let message = action.success_message(target.len());
                    if !message.is_empty() {
                        toast_success(&store, message);
                    }
                }
                on_outcome(outcome);
            }
            Err(e) => toast_error(&store, &format!("{}失败", action.label()), &e),
        }
    });
}

#[component]
pub fn AdminApp() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (connection, set_connection) = signal(Connection::Checking);

    match ctx.gateway() {
        Ok(gateway) => spawn_local(async move {
            match ping(gateway.as_ref()).await {
                Ok(()) => {
                    tracing::info!("[ADMIN] backend reachable");
                    set_connection.set(Connection::Connected);
                }
                Err(e) => {
                    set_connection.set(Connection::Failed);
                    toast_error(&store, "数据库连接失败", &e);
                }
            }
        }),
        Err(e) => {
            tracing::warn!("[ADMIN] {}", e);
            set_connection.set(Connection::Unconfigured);
        }
    }

    view! {
        <div class="admin-layout">
            <header class="admin-header">
                <h1>"AI Farm 管理后台"</h1>
                <span class="connection-status">{move || connection.get().label()}</span>
                <button class="btn btn-secondary" on:click=move |_| ctx.reload()>"刷新"</button>
                <LogPanel />
            </header>
            <SectionTabBar admin=true />
            <main class="admin-content">
                {move || match store.section().get() {
                    Section::Tools => view! { <AdminToolsPanel /> }.into_any(),
                    Section::Tutorials => view! { <AdminTutorialsPanel /> }.into_any(),
                    Section::WeekReports => view! { <AdminWeekReportsPanel /> }.into_any(),
                    Section::Guestbook => view! { <AdminGuestbookPanel /> }.into_any(),
                }}
            </main>
            <ToastHost />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_mode_labels() {
        assert_eq!(EditMode::Create.title("工具"), "添加工具");
        assert_eq!(EditMode::Update("1".into()).title("周报"), "编辑周报");
        assert_eq!(EditMode::Create.saved_message("教程"), "教程添加成功");
        assert_eq!(EditMode::Update("1".into()).saved_message("教程"), "教程更新成功");
    }
}
