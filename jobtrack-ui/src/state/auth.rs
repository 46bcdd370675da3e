//! Authentication State
//!
//! Tracks the signed-in user. The session token lives in local storage so
//! a reload restores the session through `/me`.

use leptos::*;

use crate::api;
use super::global::CurrentUser;

#[derive(Clone, Copy)]
pub struct AuthState {
    /// Signed-in user, `None` when signed out
    pub user: RwSignal<Option<CurrentUser>>,
    /// True until the stored token has been checked
    pub loading: RwSignal<bool>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.get().is_some()
    }

    pub fn sign_in(&self, session: api::AuthSession) {
        self.user.set(Some(session.user));
    }

    /// Revoke the session server-side and forget it locally
    pub fn logout(&self) {
        let user = self.user;
        spawn_local(async move {
            if let Err(e) = api::logout().await {
                web_sys::console::warn_1(&format!("Logout failed: {}", e).into());
            }
            user.set(None);
        });
    }
}

/// Provide auth state and restore any stored session
pub fn provide_auth_state() -> AuthState {
    let state = AuthState {
        user: create_rw_signal(None),
        loading: create_rw_signal(true),
    };

    if api::get_token().is_some() {
        spawn_local(async move {
            match api::fetch_me().await {
                Ok(user) => state.user.set(Some(user)),
                Err(e) => {
                    web_sys::console::log_1(&format!("Stored session rejected: {}", e).into());
                    api::clear_token();
                }
            }
            state.loading.set(false);
        });
    } else {
        state.loading.set(false);
    }

    provide_context(state);
    state
}
