//! Job Card Component
//!
//! One job application with its status badge and edit/delete actions.

use leptos::*;

use crate::api;
use crate::state::{GlobalState, Job, JobStatus};

#[component]
pub fn StatusBadge(status: JobStatus) -> impl IntoView {
    view! {
        <span class=format!("px-2 py-1 rounded-full text-xs font-semibold {}", status.badge_class())>
            {status.as_str()}
        </span>
    }
}

#[component]
pub fn JobCard(job: Job) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let editable = job.clone();
    let on_edit = move |_| state.editing.set(Some(editable.clone()));

    let id = job.id.clone();
    let label = format!("{} at {}", job.position, job.company);
    let on_delete = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&format!("Delete {}?", label)).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let id = id.clone();
        spawn_local(async move {
            match api::delete_job(&id).await {
                Ok(()) => {
                    state.show_success("Job application deleted.");
                    state.refresh();
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Delete job failed: {}", e).into());
                    state.show_error("Failed to delete job.");
                }
            }
        });
    };

    view! {
        <div class="bg-gray-800 rounded-lg p-4 space-y-2">
            <div class="flex items-start justify-between">
                <div>
                    <h3 class="text-lg font-semibold">{job.company.clone()}</h3>
                    <p class="text-gray-300">{job.position.clone()}</p>
                </div>
                <StatusBadge status=job.status />
            </div>

            <p class="text-sm text-gray-400">"Applied on " {job.applied_on()}</p>

            {job.interview_date.map(|date| view! {
                <p class="text-sm text-yellow-300">"Interview: " {date.format("%b %e, %Y").to_string()}</p>
            })}

            {job.notes.clone().map(|notes| view! {
                <p class="text-sm text-gray-300 whitespace-pre-line">{notes}</p>
            })}

            <div class="flex space-x-2 pt-2">
                <button
                    class="px-3 py-1 text-sm rounded bg-gray-700 hover:bg-gray-600 transition-colors"
                    on:click=on_edit
                >
                    "Edit"
                </button>
                <button
                    class="px-3 py-1 text-sm rounded bg-red-700 hover:bg-red-600 transition-colors"
                    on:click=on_delete
                >
                    "Delete"
                </button>
            </div>
        </div>
    }
}
