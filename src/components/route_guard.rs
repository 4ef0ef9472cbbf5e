//! Role-gated wrapper for route views.

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;

use crate::components::auth_provider::use_auth;
use crate::net::types::Role;
use crate::util::auth::{Access, check_access};

/// Render `children` only for an authenticated user whose role is in
/// `allowed`; anyone else is redirected. Holds no state of its own.
#[component]
pub fn RouteGuard(allowed: &'static [Role], children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    move || match check_access(&auth.state(), allowed) {
        Access::Granted => children().into_any(),
        Access::Redirect { to, replace } => {
            let options = NavigateOptions { replace, ..NavigateOptions::default() };
            view! { <Redirect path=to options=options/> }.into_any()
        }
    }
}
