//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::error::FarmError;

const TOAST_MS: u32 = 3000;

/// Top-level section, shared by the public site and the admin panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Tools,
    Tutorials,
    WeekReports,
    Guestbook,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Tools,
        Section::Tutorials,
        Section::WeekReports,
        Section::Guestbook,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Tools => "AI 工具",
            Section::Tutorials => "教程",
            Section::WeekReports => "周报",
            Section::Guestbook => "留言板",
        }
    }

    pub fn hash(&self) -> &'static str {
        match self {
            Section::Tools => "tools",
            Section::Tutorials => "tutorials",
            Section::WeekReports => "weekreport",
            Section::Guestbook => "guestbook",
        }
    }

    pub fn from_hash(hash: &str) -> Option<Self> {
        let hash = hash.trim_start_matches('#');
        Section::ALL.into_iter().find(|s| s.hash() == hash)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Section currently shown
    pub section: Section,
    /// Visible notifications, oldest first
    pub toasts: Vec<Toast>,
    pub next_toast_id: u32,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

fn take_toast_id(store: &AppStore) -> u32 {
    let field = store.next_toast_id();
    let mut next = field.write();
    *next += 1;
    *next
}

/// Show a toast that disappears on its own
pub fn store_push_toast(store: &AppStore, message: impl Into<String>, kind: ToastKind) {
    let id = take_toast_id(store);
    store.toasts().write().push(Toast {
        id,
        message: message.into(),
        kind,
    });

    let store = *store;
    Timeout::new(TOAST_MS, move || store_dismiss_toast(&store, id)).forget();
}

pub fn store_dismiss_toast(store: &AppStore, id: u32) {
    store.toasts().write().retain(|t| t.id != id);
}

pub fn toast_success(store: &AppStore, message: impl Into<String>) {
    store_push_toast(store, message, ToastKind::Success);
}

/// Log and surface a failed operation
pub fn toast_error(store: &AppStore, context: &str, error: &FarmError) {
    tracing::error!("[APP] {}: {}", context, error);
    store_push_toast(store, format!("{}: {}", context, error), ToastKind::Error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_hash_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_hash(&format!("#{}", section.hash())), Some(section));
        }
        assert_eq!(Section::from_hash("#admin"), None);
    }

    #[test]
    fn test_toast_ids_are_unique_and_dismiss_by_id() {
        let owner = Owner::new();
        owner.with(|| {
            let store = Store::new(AppState::default());
            let first = take_toast_id(&store);
            let second = take_toast_id(&store);
            assert_eq!((first, second), (1, 2));

            store.toasts().write().extend([
                Toast { id: first, message: "a".into(), kind: ToastKind::Success },
                Toast { id: second, message: "b".into(), kind: ToastKind::Error },
            ]);
            store_dismiss_toast(&store, first);
            let left: Vec<u32> = store.toasts().with_untracked(|t| t.iter().map(|t| t.id).collect());
            assert_eq!(left, vec![second]);
        });
    }
}
