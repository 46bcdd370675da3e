//! Loading Component

use leptos::*;

/// Full-page loading indicator
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12 space-y-3">
            <div class="loading-spinner w-8 h-8" />
            <span class="text-gray-400">"Loading..."</span>
        </div>
    }
}
