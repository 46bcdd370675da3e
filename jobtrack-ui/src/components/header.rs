//! Header Component
//!
//! Top bar with the brand, the signed-in user's name and a logout button.

use leptos::*;
use leptos_router::*;

use crate::state::{AuthState, GlobalState};

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_context::<AuthState>().expect("AuthState not found");
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let display_name = move || {
        auth.user.get()
            .map(|user| if user.full_name == "N/A" { user.email } else { user.full_name })
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        state.clear();
        auth.logout();
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"💼"</span>
                        <span class="text-xl font-bold text-white">"Job Tracker"</span>
                    </A>

                    <div class="flex items-center space-x-4">
                        <span class="text-gray-300">"Welcome, " {display_name}</span>
                        <button
                            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                            on:click=on_logout
                        >
                            "Logout"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}
