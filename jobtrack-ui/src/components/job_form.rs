//! Job Form Component
//!
//! Form for adding a job application, plus the field parsing shared with the
//! edit modal.

use chrono::NaiveDate;
use leptos::*;

use crate::api::{self, JobForm as JobFields};
use crate::state::{GlobalState, JobStatus};

/// Parse an `<input type="date">` value
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn format_date_input(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Build the request body from raw form values
pub fn build_fields(
    company: &str,
    position: &str,
    status: &str,
    notes: &str,
    interview_date: &str,
) -> Result<JobFields, &'static str> {
    let company = company.trim();
    let position = position.trim();
    if company.is_empty() || position.is_empty() {
        return Err("Company and position are required.");
    }

    let notes = notes.trim();
    Ok(JobFields {
        company: company.to_string(),
        position: position.to_string(),
        status: JobStatus::parse(status).unwrap_or_default(),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        interview_date: parse_date_input(interview_date),
    })
}

/// Status `<option>`s
#[component]
pub fn StatusOptions(#[prop(into)] selected: Signal<String>) -> impl IntoView {
    JobStatus::all().into_iter().map(|status| {
        let value = status.as_str();
        view! {
            <option value=value prop:selected=move || selected.get() == value>{value}</option>
        }
    }).collect_view()
}

#[component]
pub fn JobForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let company = create_rw_signal(String::new());
    let position = create_rw_signal(String::new());
    let status = create_rw_signal(JobStatus::Applied.as_str().to_string());
    let notes = create_rw_signal(String::new());
    let interview_date = create_rw_signal(String::new());
    let submitting = create_rw_signal(false);

    let reset = move || {
        company.set(String::new());
        position.set(String::new());
        status.set(JobStatus::Applied.as_str().to_string());
        notes.set(String::new());
        interview_date.set(String::new());
    };

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

        submitting.set(true);
        spawn_local(async move {
            match api::create_job(&fields).await {
                Ok(_) => {
                    state.show_success("Job application added!");
                    reset();
                    state.refresh();
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Create job failed: {}", e).into());
                    state.show_error("Failed to add job.");
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <form class="bg-gray-800 rounded-lg p-6 space-y-4" on:submit=on_submit>
            <h2 class="text-xl font-semibold">"Add Job Application"</h2>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <input
                    type="text"
                    placeholder="Company"
                    class="input"
                    prop:value=move || company.get()
                    on:input=move |ev| company.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Position"
                    class="input"
                    prop:value=move || position.get()
                    on:input=move |ev| position.set(event_target_value(&ev))
                />
                <select
                    class="input"
                    on:change=move |ev| status.set(event_target_value(&ev))
                >
                    <StatusOptions selected=status />
                </select>
                <input
                    type="date"
                    class="input"
                    prop:value=move || interview_date.get()
                    on:input=move |ev| interview_date.set(event_target_value(&ev))
                />
            </div>

            <textarea
                placeholder="Notes"
                class="input w-full"
                rows="3"
                prop:value=move || notes.get()
                on:input=move |ev| notes.set(event_target_value(&ev))
            />

            <button
                type="submit"
                class="px-6 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors disabled:opacity-50"
                disabled=move || submitting.get()
            >
                {move || if submitting.get() { "Adding..." } else { "Add Job" }}
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_fields_trims_and_defaults() {
        let fields = build_fields(" Acme ", "Engineer", "", "  ", "").unwrap();
        assert_eq!(fields.company, "Acme");
        assert_eq!(fields.status, JobStatus::Applied);
        assert_eq!(fields.notes, None);
        assert_eq!(fields.interview_date, None);
    }

    #[test]
    fn test_build_fields_requires_company_and_position() {
        assert!(build_fields("", "Engineer", "Applied", "", "").is_err());
        assert!(build_fields("Acme", "   ", "Applied", "", "").is_err());
    }

    #[test]
    fn test_date_input_round_trip() {
        let date = parse_date_input("2024-05-17");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 17));
        assert_eq!(format_date_input(date), "2024-05-17");
        assert_eq!(parse_date_input("not a date"), None);
        assert_eq!(format_date_input(None), "");
    }
}
