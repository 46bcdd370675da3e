//! Pages
//!
//! Top-level page components for each route.

pub mod home;
pub mod login;
pub mod not_found;
pub mod register;

pub use home::Home;
pub use login::Login;
pub use not_found::NotFound;
pub use register::Register;
