//! Deferred page mount with a loading placeholder.

use leptos::prelude::*;

use crate::pages::PageRegistry;
use crate::routes::Page;

/// Resolve `page`'s module on demand, showing a placeholder until it is ready.
#[component]
pub fn LazyPage(page: Page) -> impl IntoView {
    let registry = expect_context::<PageRegistry>();
    let module = LocalResource::new(move || {
        let registry = registry.clone();
        async move { registry.load(page).await }
    });

    view! {
        <Suspense fallback=|| view! { <div class="page-loading">"Loading..."</div> }>
            {move || Suspend::new(async move {
                let render = module.await;
                render()
            })}
        </Suspense>
    }
}
