//! Authentication context and hooks for the UI.
//!
//! [`AuthProvider`] polls [`api::get_auth_state`] on mount and every 30 seconds. The
//! server re-runs the domain gate on each poll, so the snapshot here is always the
//! gate's decision. On the web it also installs a `beforeunload` beacon that asks
//! the server to close the usage session of the page being torn down.

use api::UserInfo;
use dioxus::prelude::*;

use crate::icons::{FaGoogle, FaRightFromBracket, FaSpinner};
use crate::Icon;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    /// Rejection message of the last sign-in attempt.
    pub error: Option<String>,
    pub allowed_domain: String,
    pub loading: bool,
    /// Whether the last auth check reached the server.
    pub online: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            error: None,
            allowed_domain: String::new(),
            loading: true,
            online: false,
        }
    }
}

impl AuthState {
    fn from_snapshot(snapshot: api::AuthSnapshot) -> Self {
        Self {
            user: snapshot.user,
            error: snapshot.error,
            allowed_domain: snapshot.allowed_domain,
            loading: false,
            online: true,
        }
    }
}

/// Get the current authentication state.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that manages authentication state.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    let _ = use_resource(move || async move {
        match api::get_auth_state().await {
            Ok(snapshot) => auth_state.set(AuthState::from_snapshot(snapshot)),
            Err(e) => {
                tracing::error!("Failed to load auth state: {}", e);
                auth_state.set(AuthState {
                    loading: false,
                    ..AuthState::default()
                });
            }
        }
    });

    use_effect(move || {
        spawn(async move {
            loop {
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::sleep(std::time::Duration::from_secs(30)).await;
                #[cfg(not(target_arch = "wasm32"))]
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;

                if auth_state().loading {
                    continue;
                }
                match api::get_auth_state().await {
                    Ok(snapshot) => {
                        let next = AuthState::from_snapshot(snapshot);
                        if auth_state() != next {
                            auth_state.set(next);
                        }
                    }
                    Err(_) => {
                        if auth_state().online {
                            let current = auth_state();
                            auth_state.set(AuthState {
                                online: false,
                                ..current
                            });
                        }
                    }
                }
            }
        });
    });

    use_hook(install_unload_beacon);

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Send the usage-end beacon when the page goes away.
#[cfg(target_arch = "wasm32")]
fn install_unload_beacon() {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let on_unload = Closure::<dyn FnMut()>::new(|| {
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().send_beacon(api::USAGE_END_PATH);
        }
    });
    if let Err(e) = window
        .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())
    {
        tracing::warn!("Failed to install unload beacon: {:?}", e);
    }
    // Lives as long as the page.
    on_unload.forget();
}

#[cfg(not(target_arch = "wasm32"))]
fn install_unload_beacon() {}

/// Button that starts the OAuth flow for `provider`.
#[component]
pub fn LoginButton(
    provider: String,
    #[props(default = "Login".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let is_google = provider == "google";
    let provider_clone = provider.clone();
    let mut loading = use_signal(|| false);

    let onclick = move |_| {
        let provider = provider_clone.clone();
        async move {
            loading.set(true);
            match api::get_login_url(provider).await {
                Ok(url) => {
                    #[cfg(target_arch = "wasm32")]
                    {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().set_href(&url);
                        }
                    }
                    #[cfg(not(target_arch = "wasm32"))]
                    tracing::info!("Login URL: {}", url);
                }
                Err(e) => {
                    tracing::error!("Failed to get login URL: {}", e);
                    loading.set(false);
                }
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            if loading() {
                Icon { icon: FaSpinner, width: 18, height: 18, class: "spin" }
            } else {
                if is_google {
                    Icon { icon: FaGoogle, width: 18, height: 18 }
                }
                "{label}"
            }
        }
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth_state = use_auth();

    let onclick = move |_| async move {
        match api::logout().await {
            Ok(()) => {
                auth_state.set(AuthState {
                    user: None,
                    error: None,
                    loading: false,
                    ..auth_state()
                });
                #[cfg(target_arch = "wasm32")]
                {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href("/login");
                    }
                }
            }
            Err(e) => tracing::error!("Logout failed: {}", e),
        }
    };

    rsx! {
        button {
            class: "{class}",
            title: "{label}",
            onclick: onclick,
            Icon { icon: FaRightFromBracket, width: 14, height: 14 }
            span { "{label}" }
        }
    }
}
