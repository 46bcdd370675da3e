//! Route Guards
//!
//! `ProtectedRoute` sends signed-out visitors to `/login`;
//! `RedirectIfAuthenticated` sends signed-in users from the auth pages to `/`.
//! Both show a loading indicator while the stored session is being checked.

use leptos::*;
use leptos_router::*;

use super::loading::Loading;
use crate::state::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Protected,
    GuestOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Render,
    Redirect(&'static str),
}

pub fn guard_decision(guard: Guard, loading: bool, authenticated: bool) -> GuardDecision {
    if loading {
        return GuardDecision::Loading;
    }
    match (guard, authenticated) {
        (Guard::Protected, false) => GuardDecision::Redirect("/login"),
        (Guard::GuestOnly, true) => GuardDecision::Redirect("/"),
        _ => GuardDecision::Render,
    }
}

fn guarded(guard: Guard, children: ChildrenFn) -> impl IntoView {
    let auth = use_context::<AuthState>().expect("AuthState not found");

    move || match guard_decision(guard, auth.loading.get(), auth.is_authenticated()) {
        GuardDecision::Loading => view! { <Loading /> }.into_view(),
        GuardDecision::Render => children().into_view(),
        GuardDecision::Redirect(path) => view! { <Redirect path=path /> }.into_view(),
    }
}

/// Render children only for a signed-in user
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    guarded(Guard::Protected, children)
}

/// Render children only for a signed-out visitor
#[component]
pub fn RedirectIfAuthenticated(children: ChildrenFn) -> impl IntoView {
    guarded(Guard::GuestOnly, children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_wins() {
        assert_eq!(guard_decision(Guard::Protected, true, false), GuardDecision::Loading);
        assert_eq!(guard_decision(Guard::GuestOnly, true, true), GuardDecision::Loading);
    }

    #[test]
    fn test_protected() {
        assert_eq!(guard_decision(Guard::Protected, false, false), GuardDecision::Redirect("/login"));
        assert_eq!(guard_decision(Guard::Protected, false, true), GuardDecision::Render);
    }

    #[test]
    fn test_guest_only() {
        assert_eq!(guard_decision(Guard::GuestOnly, false, true), GuardDecision::Redirect("/"));
        assert_eq!(guard_decision(Guard::GuestOnly, false, false), GuardDecision::Render);
    }
}
