//! Landing page for field workers and production operators.

use leptos::prelude::*;

use crate::components::page_shell::PageShell;
use crate::routes::Page;

#[component]
pub fn FieldWorkerPage() -> impl IntoView {
    view! {
        <PageShell page=Page::FieldWorker>
            <p>"Scan or select a crate to record production and field activity."</p>
        </PageShell>
    }
}
