//! Form Field Component
//!
//! Labelled input slot with the inline validation message under it.

use leptos::prelude::*;

use crate::error::FarmError;

#[component]
pub fn FormField(
    #[prop(into)] label: String,
    #[prop(into)] error: Signal<Option<String>>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="form-group" class:has-error=move || error.with(Option::is_some)>
            <label>{label}</label>
            {children()}
            <span class="error-message">{move || error.get()}</span>
        </div>
    }
}

/// Message for `field` from the last failed validation
pub fn field_error(errors: ReadSignal<Option<FarmError>>, field: &'static str) -> Signal<Option<String>> {
    Signal::derive(move || {
        errors.with(|e| e.as_ref().and_then(|e| e.field_message(field)).map(str::to_string))
    })
}
