//! Dashboard Panel Component
//!
//! Status counts, jobs in the interview stage and the five most recent
//! applications.

use leptos::*;

use super::job_card::StatusBadge;
use crate::state::{DashboardStats, GlobalState, Job};

#[component]
pub fn DashboardPanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    move || match state.stats.get() {
        Some(stats) => view! { <StatsView stats=stats /> }.into_view(),
        None => view! {
            <div class="bg-gray-800 rounded-lg p-6 animate-pulse h-32" />
        }.into_view(),
    }
}

#[component]
fn StatsView(stats: DashboardStats) -> impl IntoView {
    view! {
        <section class="space-y-6">
            <div class="grid grid-cols-2 md:grid-cols-5 gap-4">
                <div class="bg-gray-800 rounded-lg p-4">
                    <p class="text-sm text-gray-400">"Total"</p>
                    <p class="text-3xl font-bold">{stats.total}</p>
                </div>
                {stats.applications_by_status.into_iter().map(|entry| view! {
                    <div class="bg-gray-800 rounded-lg p-4 space-y-2">
                        <StatusBadge status=entry.status />
                        <p class="text-3xl font-bold">{entry.count}</p>
                    </div>
                }).collect_view()}
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <div class="bg-gray-800 rounded-lg p-4">
                    <h3 class="text-lg font-semibold mb-3">"Upcoming Interviews"</h3>
                    <JobSummaryList
                        jobs=stats.upcoming_interviews
                        empty="No interviews scheduled."
                        show_notes=true
                    />
                </div>
                <div class="bg-gray-800 rounded-lg p-4">
                    <h3 class="text-lg font-semibold mb-3">"Recent Activity"</h3>
                    <JobSummaryList
                        jobs=stats.recent_activities
                        empty="No applications yet."
                        show_notes=false
                    />
                </div>
            </div>
        </section>
    }
}

#[component]
fn JobSummaryList(jobs: Vec<Job>, empty: &'static str, show_notes: bool) -> impl IntoView {
    if jobs.is_empty() {
        return view! { <p class="text-gray-400 text-sm">{empty}</p> }.into_view();
    }

    view! {
        <ul class="space-y-3">
            {jobs.into_iter().map(|job| view! {
                <li class="border-b border-gray-700 pb-2 last:border-0">
                    <div class="flex items-center justify-between">
                        <span class="font-medium">{job.company.clone()} " - " {job.position.clone()}</span>
                        <StatusBadge status=job.status />
                    </div>
                    <p class="text-xs text-gray-400">"Applied on " {job.applied_on()}</p>
                    {job.interview_date.map(|date| view! {
                        <p class="text-xs text-yellow-300">"Interview: " {date.format("%b %e, %Y").to_string()}</p>
                    })}
                    {show_notes.then(|| job.notes.clone()).flatten().map(|notes| view! {
                        <p class="text-xs text-gray-300">{notes}</p>
                    })}
                </li>
            }).collect_view()}
        </ul>
    }.into_view()
}
