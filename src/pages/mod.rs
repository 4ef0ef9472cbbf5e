//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration. Pages flagged lazy in the
//! route table are initialized on first visit through [`PageRegistry::load`], a
//! future-backed factory that yields one tick so the placeholder paints
//! before the page mounts; later visits resolve immediately.


pub mod admin;
pub mod dispatch;
pub mod field_worker;
pub mod login;

use std::sync::{Arc, Mutex, PoisonError};

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;

use crate::routes::Page;

/// Factory producing a page's view.
pub type PageView = fn() -> AnyView;

/// View factory for `page`.
#[must_use]
pub fn page_view(page: Page) -> PageView {
    match page {
        Page::Login => || view! { <login::LoginPage/> }.into_any(),
        Page::FieldWorker => || view! { <field_worker::FieldWorkerPage/> }.into_any(),
        Page::AdminDashboard => || view! { <admin::AdminDashboardPage/> }.into_any(),
        Page::AdminUsers => || view! { <admin::AdminUsersPage/> }.into_any(),
        Page::AdminCrates => || view! { <admin::AdminCratesPage/> }.into_any(),
        Page::AdminLogs => || view! { <admin::AdminLogsPage/> }.into_any(),
        Page::AdminSettings => || view! { <admin::AdminSettingsPage/> }.into_any(),
        Page::Dispatch => || view! { <dispatch::DispatchPage/> }.into_any(),
    }
}

/// Lazy pages initialized so far. One registry is provided per app mount.
#[derive(Clone, Debug, Default)]
pub struct PageRegistry {
    loaded: Arc<Mutex<Vec<Page>>>,
}

impl PageRegistry {
    /// Whether `page`'s module has been initialized.
    #[must_use]
    pub fn is_loaded(&self, page: Page) -> bool {
        !page.is_lazy() || self.loaded.lock().unwrap_or_else(PoisonError::into_inner).contains(&page)
    }

    /// Initialize `page`'s module on first use and return its view factory.
    pub async fn load(&self, page: Page) -> PageView {
        if !self.is_loaded(page) {
            #[cfg(feature = "csr")]
            gloo_timers::future::TimeoutFuture::new(0).await;
            let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
            if !loaded.contains(&page) {
                loaded.push(page);
            }
        }
        page_view(page)
    }
}
