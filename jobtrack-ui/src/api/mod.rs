//! API Client Module
//!
//! HTTP calls to the jobtrack REST API.

pub mod client;

pub use client::*;
