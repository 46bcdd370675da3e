//! jobtrack Web Client
//!
//! Job application tracker built with Leptos (WASM).
//!
//! # Features
//!
//! - Email/password sign-up and login
//! - Job application list with search, edit and delete
//! - Dashboard of status counts, interviews and recent activity
//! - WebSocket live updates
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the jobtrack API over HTTP and WebSocket.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
