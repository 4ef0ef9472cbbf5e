//! Root application component with routing and the auth provider.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    NavigateOptions, StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::auth_provider::AuthProvider;
use crate::components::lazy_page::LazyPage;
use crate::components::route_guard::RouteGuard;
use crate::config::SupabaseConfig;
use crate::net::profile::ProfileStore;
use crate::net::session::SessionClient;
use crate::net::supabase::SupabaseClient;
use crate::pages::{self, PageRegistry, login::LoginPage};
use crate::routes::Page;
use crate::util::auth::ROOT_PATH;

/// Root application component.
///
/// Builds the Supabase client, provides the auth store, and mounts the
/// route table.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(PageRegistry::default());

    let config = SupabaseConfig::from_build_env().unwrap_or_else(|e| {
        leptos::logging::warn!("{e}; using local Supabase");
        SupabaseConfig::local()
    });
    let supabase = Arc::new(SupabaseClient::new(config));
    let client: Arc<dyn SessionClient> = supabase.clone();
    let profiles: Arc<dyn ProfileStore> = supabase;

    view! {
        <Stylesheet id="leptos" href="/pkg/crate-ops.css"/>
        <Title text="Crate Ops"/>

        <AuthProvider client=client profiles=profiles>
            <Router>
                <Routes fallback=|| {
                    let options = NavigateOptions { replace: true, ..NavigateOptions::default() };
                    view! { <Redirect path=ROOT_PATH options=options/> }
                }>
                    <Route path=StaticSegment("") view=LoginPage/>
                    <Route path=StaticSegment("field-worker") view=|| page_route(Page::FieldWorker)/>
                    <Route path=StaticSegment("admin") view=|| page_route(Page::AdminDashboard)/>
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("users"))
                        view=|| page_route(Page::AdminUsers)
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("crates"))
                        view=|| page_route(Page::AdminCrates)
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("logs"))
                        view=|| page_route(Page::AdminLogs)
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("settings"))
                        view=|| page_route(Page::AdminSettings)
                    />
                    <Route path=StaticSegment("dispatch") view=|| page_route(Page::Dispatch)/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}

/// Wrap `page` according to its route-table entry: guarded pages go behind
/// `RouteGuard`, lazy ones additionally behind `LazyPage`.
fn page_route(page: Page) -> AnyView {
    let Some(allowed) = page.allowed_roles() else {
        return pages::page_view(page)();
    };
    view! {
        <RouteGuard allowed=allowed>
            {move || {
                if page.is_lazy() {
                    view! { <LazyPage page=page/> }.into_any()
                } else {
                    pages::page_view(page)()
                }
            }}
        </RouteGuard>
    }
    .into_any()
}
