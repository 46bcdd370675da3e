//! Home Page
//!
//! Dashboard, add form, search and the job list for the signed-in user.

use leptos::*;

use crate::components::{DashboardPanel, EditModal, Header, JobCard, JobForm, SearchBar};
use crate::state::GlobalState;

#[component]
pub fn Home() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Initial load; live updates arrive over the WebSocket afterwards
    state.refresh();

    let searching = move || !state.search_query.get().trim().is_empty();

    view! {
        <div class="min-h-screen flex flex-col">
            <Header />

            <main class="flex-1 container mx-auto px-4 py-8 space-y-8">
                <DashboardPanel />

                <JobForm />

                <section class="space-y-4">
                    <div class="flex items-center justify-between">
                        <h2 class="text-xl font-semibold">
                            {move || if searching() { "Search Results" } else { "Your Applications" }}
                        </h2>
                        <div class="flex items-center space-x-4">
                            {move || state.loading.get().then(|| view! {
                                <span class="flex items-center space-x-2 text-sm text-gray-400">
                                    <span class="inline-block loading-spinner w-4 h-4" />
                                    <span>"Refreshing..."</span>
                                </span>
                            })}
                            <ConnectionStatus />
                        </div>
                    </div>

                    <SearchBar />

                    {move || {
                        let jobs = state.visible_jobs();
                        if jobs.is_empty() {
                            let message = if searching() {
                                "No jobs match your search."
                            } else {
                                "No job applications yet. Add one above."
                            };
                            view! { <p class="text-gray-400">{message}</p> }.into_view()
                        } else {
                            view! {
                                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                                    {jobs.into_iter()
                                        .map(|job| view! { <JobCard job=job /> })
                                        .collect_view()}
                                </div>
                            }.into_view()
                        }
                    }}
                </section>
            </main>

            <EditModal />
        </div>
    }
}

/// Live-update indicator
#[component]
fn ConnectionStatus() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || {
        if state.ws_connected.get() {
            view! {
                <span class="flex items-center space-x-1 text-sm text-green-400">
                    <span class="w-2 h-2 bg-green-400 rounded-full pulse" />
                    <span>"Live"</span>
                </span>
            }.into_view()
        } else {
            view! {
                <span class="flex items-center space-x-1 text-sm text-red-400">
                    <span class="w-2 h-2 bg-red-400 rounded-full" />
                    <span>"Offline"</span>
                </span>
            }.into_view()
        }
    }
}
