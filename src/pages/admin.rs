//! Admin pages. Crate management, activity logs and settings are mounted
//! lazily (see `routes::Page::is_lazy`).

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::page_shell::PageShell;
use crate::routes::Page;

const SECTIONS: [Page; 4] = [Page::AdminUsers, Page::AdminCrates, Page::AdminLogs, Page::AdminSettings];

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! {
        <PageShell page=Page::AdminDashboard>
            <nav class="admin-nav">
                {SECTIONS
                    .into_iter()
                    .map(|page| view! { <A href=page.path()>{page.title()}</A> })
                    .collect_view()}
            </nav>
        </PageShell>
    }
}

#[component]
pub fn AdminUsersPage() -> impl IntoView {
    view! {
        <PageShell page=Page::AdminUsers>
            <p>"Accounts and their roles."</p>
        </PageShell>
    }
}

#[component]
pub fn AdminCratesPage() -> impl IntoView {
    view! {
        <PageShell page=Page::AdminCrates>
            <p>"Crate inventory and lifecycle."</p>
        </PageShell>
    }
}

#[component]
pub fn AdminLogsPage() -> impl IntoView {
    view! {
        <PageShell page=Page::AdminLogs>
            <p>"Recent activity across all users."</p>
        </PageShell>
    }
}

#[component]
pub fn AdminSettingsPage() -> impl IntoView {
    view! {
        <PageShell page=Page::AdminSettings>
            <p>"System-wide configuration."</p>
        </PageShell>
    }
}
