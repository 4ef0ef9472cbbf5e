//! Landing page for dispatch coordinators.

use leptos::prelude::*;

use crate::components::page_shell::PageShell;
use crate::routes::Page;

#[component]
pub fn DispatchPage() -> impl IntoView {
    view! {
        <PageShell page=Page::Dispatch>
            <p>"Outbound crates awaiting dispatch appear here."</p>
        </PageShell>
    }
}
