//! Search Bar Component
//!
//! Prefix search over company and position. A blank query shows every job.

use leptos::*;

use crate::api;
use crate::state::GlobalState;

#[component]
pub fn SearchBar() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let on_input = move |ev: ev::Event| {
        let query = event_target_value(&ev);
        state.search_query.set(query.clone());

        if query.trim().is_empty() {
            state.search_results.set(None);
            return;
        }

        spawn_local(async move {
            let result = api::fetch_jobs(Some(&query)).await;
            // A newer keystroke has superseded this request
            if state.search_query.get_untracked() != query {
                return;
            }
            match result {
                Ok(jobs) => state.search_results.set(Some(jobs)),
                Err(e) => state.show_error(&format!("Search failed: {}", e)),
            }
        });
    };

    view! {
        <div class="relative">
            <input
                type="search"
                placeholder="Search by company or position..."
                class="input w-full"
                prop:value=move || state.search_query.get()
                on:input=on_input
            />
        </div>
    }
}
