//! Edit Modal Component
//!
//! Overlay form for the job in `GlobalState::editing`. Saving replaces every
//! field, so clearing notes or the interview date removes them.

use leptos::*;

use super::job_form::{build_fields, format_date_input, StatusOptions};
use crate::api;
use crate::state::{GlobalState, Job};

#[component]
pub fn EditModal() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || state.editing.get().map(|job| view! { <EditForm job=job /> })
}

#[component]
fn EditForm(job: Job) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let company = create_rw_signal(job.company.clone());
    let position = create_rw_signal(job.position.clone());
    let status = create_rw_signal(job.status.as_str().to_string());
    let notes = create_rw_signal(job.notes.clone().unwrap_or_default());
    let interview_date = create_rw_signal(format_date_input(job.interview_date));
    let saving = create_rw_signal(false);

    let close = move || state.editing.set(None);

    let id = job.id.clone();
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let fields = match build_fields(
            &company.get_untracked(),
            &position.get_untracked(),
            &status.get_untracked(),
            &notes.get_untracked(),
            &interview_date.get_untracked(),
        ) {
            Ok(fields) => fields,
            Err(message) => {
                state.show_error(message);
                return;
            }
        };

        let id = id.clone();
        saving.set(true);
        spawn_local(async move {
            match api::update_job(&id, &fields).await {
                Ok(_) => {
                    state.show_success("Job application updated!");
                    close();
                    state.refresh();
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Update job failed: {}", e).into());
                    state.show_error("Failed to update job.");
                }
            }
            saving.set(false);
        });
    };

    view! {
        <div class="fixed inset-0 bg-black/60 z-40 flex items-center justify-center">
            <form class="bg-gray-800 rounded-lg p-6 w-full max-w-lg space-y-4" on:submit=on_submit>
                <h2 class="text-xl font-semibold">"Edit Job Application"</h2>

                <input
                    type="text"
                    placeholder="Company"
                    class="input w-full"
                    prop:value=move || company.get()
                    on:input=move |ev| company.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Position"
                    class="input w-full"
                    prop:value=move || position.get()
                    on:input=move |ev| position.set(event_target_value(&ev))
                />
                <select
                    class="input w-full"
                    on:change=move |ev| status.set(event_target_value(&ev))
                >
                    <StatusOptions selected=status />
                </select>
                <input
                    type="date"
                    class="input w-full"
                    prop:value=move || interview_date.get()
                    on:input=move |ev| interview_date.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="Notes"
                    class="input w-full"
                    rows="4"
                    prop:value=move || notes.get()
                    on:input=move |ev| notes.set(event_target_value(&ev))
                />

                <div class="flex justify-end space-x-2">
                    <button
                        type="button"
                        class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 transition-colors"
                        on:click=move |_| close()
                    >
                        "Cancel"
                    </button>
                    <button
                        type="submit"
                        class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 transition-colors disabled:opacity-50"
                        disabled=move || saving.get()
                    >
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
