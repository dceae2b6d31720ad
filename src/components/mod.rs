//! UI Components
//!
//! Reusable Leptos components plus one view per public section and one
//! panel per admin section.

mod clear_filters_button;
mod delete_confirm_button;
mod form_field;
mod log_panel;
mod modal;
mod pagination;
mod search_box;
mod section_tab_bar;
mod tag_filter_bar;
mod toast_host;

mod tools_view;
mod tutorials_view;
mod weekreport_view;
mod guestbook_view;

mod admin_tools_panel;
mod admin_tutorials_panel;
mod admin_weekreports_panel;
mod admin_guestbook_panel;

pub use clear_filters_button::ClearFiltersButton;
pub use delete_confirm_button::DeleteConfirmButton;
pub use form_field::{field_error, FormField};
pub use log_panel::LogPanel;
pub use modal::Modal;
pub use pagination::Pagination;
pub use search_box::SearchBox;
pub use section_tab_bar::SectionTabBar;
pub use tag_filter_bar::TagFilterBar;
pub use toast_host::ToastHost;

pub use tools_view::ToolsView;
pub use tutorials_view::TutorialsView;
pub use weekreport_view::WeekReportView;
pub use guestbook_view::GuestbookView;

pub use admin_tools_panel::AdminToolsPanel;
pub use admin_tutorials_panel::AdminTutorialsPanel;
pub use admin_weekreports_panel::AdminWeekReportsPanel;
pub use admin_guestbook_panel::AdminGuestbookPanel;
