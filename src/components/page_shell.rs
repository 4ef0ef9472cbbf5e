//! Common chrome for signed-in pages: title, identity, sign-out.

use leptos::prelude::*;

use crate::components::auth_provider::use_auth;
use crate::routes::Page;

#[component]
pub fn PageShell(page: Page, children: Children) -> impl IntoView {
    let auth = use_auth();

    let identity = move || {
        auth.state()
            .user
            .map(|user| format!("{} · {}", user.full_name, user.role.label()))
            .unwrap_or_default()
    };

    let on_logout = move |_: leptos::ev::MouseEvent| {
        // Sign-out resets the store; the route guard then redirects home.
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            auth.logout().await;
        });
    };

    view! {
        <div class="page">
            <header class="page-header">
                <h1>{page.title()}</h1>
                <span class="page-header__user">{identity}</span>
                <button
                    class="page-header__logout"
                    on:click=on_logout
                    disabled=move || auth.state().is_loading
                >
                    "Sign out"
                </button>
            </header>
            <Show when=move || auth.state().error.is_some()>
                <p class="page-error">{move || auth.state().error.unwrap_or_default()}</p>
            </Show>
            <main class="page-body">{children()}</main>
        </div>
    }
}
