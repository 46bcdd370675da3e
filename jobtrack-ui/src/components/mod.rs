//! UI Components
//!
//! Reusable Leptos components for the job tracker.

pub mod dashboard;
pub mod edit_modal;
pub mod header;
pub mod job_card;
pub mod job_form;
pub mod loading;
pub mod route_guard;
pub mod search_bar;
pub mod toast;

pub use dashboard::DashboardPanel;
pub use edit_modal::EditModal;
pub use header::Header;
pub use job_card::JobCard;
pub use job_form::JobForm;
pub use loading::Loading;
pub use route_guard::{ProtectedRoute, RedirectIfAuthenticated};
pub use search_bar::SearchBar;
pub use toast::Toast;
