//! Log Panel Component
//!
//! Admin-only view of the lines the logger keeps in memory, newest last.

use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (open, set_open) = signal(false);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let refresh = move || set_lines.set(rolling_logger::recent_lines());
    let toggle = move |_| {
        if !open.get_untracked() {
            refresh();
        }
        set_open.update(|o| *o = !*o);
    };

    view! {
        <button class="btn btn-secondary" on:click=toggle>
            {move || if open.get() { "隐藏日志" } else { "日志" }}
        </button>
        <Show when=move || open.get()>
            <section class="log-panel">
                <div class="log-panel-header">
                    <span>{move || format!("最近 {} 条日志", lines.with(Vec::len))}</span>
                    <button class="btn btn-link" on:click=move |_| refresh()>"刷新"</button>
                </div>
                <pre class="log-lines">{move || lines.with(|l| l.join("\n"))}</pre>
            </section>
        </Show>
    }
}
