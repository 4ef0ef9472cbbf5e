//! Login page with email + password sign-in and account sign-up.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::auth_provider::use_auth;
use crate::net::types::{Role, SignUpMetadata};

/// GoTrue's default minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let mode = RwSignal::new(Mode::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let role = RwSignal::new(Role::CsiFieldWorker.as_str().to_owned());
    let info = RwSignal::new(String::new());

    // Once a profile resolves, send the user to their role's landing page.
    Effect::new(move || {
        let state = auth.state();
        if let (true, Some(user)) = (state.is_authenticated, state.user) {
            navigate(user.role.home_path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.state().is_loading {
            return;
        }
        info.set(String::new());
        match mode.get() {
            Mode::SignIn => {
                let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
                    Ok(values) => values,
                    Err(msg) => {
                        info.set(msg.to_owned());
                        return;
                    }
                };
                #[cfg(feature = "csr")]
                leptos::task::spawn_local(async move {
                    // Failure is already in `state().error`; success arrives via the listener.
                    let _ = auth.login(&email_value, &password_value).await;
                });
                #[cfg(not(feature = "csr"))]
                let _ = (email_value, password_value);
            }
            Mode::SignUp => {
                let (email_value, password_value, metadata) =
                    match validate_sign_up_input(&email.get(), &password.get(), &full_name.get(), &role.get()) {
                        Ok(values) => values,
                        Err(msg) => {
                            info.set(msg.to_owned());
                            return;
                        }
                    };
                #[cfg(feature = "csr")]
                leptos::task::spawn_local(async move {
                    if auth.sign_up(&email_value, &password_value, &metadata).await.is_ok() {
                        info.set("Account created. Check your email to confirm, then sign in.".to_owned());
                        mode.set(Mode::SignIn);
                    }
                });
                #[cfg(not(feature = "csr"))]
                let _ = (email_value, password_value, metadata);
            }
        }
    };

    let toggle_mode = move |_: leptos::ev::MouseEvent| {
        info.set(String::new());
        mode.update(|m| {
            *m = match m {
                Mode::SignIn => Mode::SignUp,
                Mode::SignUp => Mode::SignIn,
            };
        });
    };

    let busy = move || auth.state().is_loading;
    let signing_up = move || mode.get() == Mode::SignUp;

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Crate Ops"</h1>
                <p class="login-card__subtitle">
                    {move || if signing_up() { "Create an account" } else { "Sign in" }}
                </p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=signing_up>
                        <input
                            class="login-input"
                            type="text"
                            placeholder="Full name"
                            prop:value=move || full_name.get()
                            on:input=move |ev| full_name.set(event_target_value(&ev))
                        />
                        <select
                            class="login-input"
                            prop:value=move || role.get()
                            on:change=move |ev| role.set(event_target_value(&ev))
                        >
                            {Role::ALL
                                .into_iter()
                                .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                                .collect_view()}
                        </select>
                    </Show>
                    <button class="login-button" type="submit" disabled=busy>
                        {move || if signing_up() { "Sign Up" } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || auth.state().error.is_some()>
                    <p class="login-message login-message--error">
                        {move || auth.state().error.unwrap_or_default()}
                    </p>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <button class="login-link" type="button" on:click=toggle_mode>
                    {move || if signing_up() { "Have an account? Sign in" } else { "New here? Create an account" }}
                </button>
            </div>
        </div>
    }
}

/// Trim and require both sign-in fields.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Validate sign-up fields and build the profile metadata.
pub fn validate_sign_up_input(
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> Result<(String, String, SignUpMetadata), &'static str> {
    let (email, password) = validate_login_input(email, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err("Enter your full name.");
    }
    let role = role.parse::<Role>().map_err(|_| "Choose a role.")?;
    Ok((email, password, SignUpMetadata { full_name: full_name.to_owned(), role }))
}
