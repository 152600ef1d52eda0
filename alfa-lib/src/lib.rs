//! Brokerage console API client library
//!
//! Async client for the agent login and insurer administration endpoints the
//! console screens feed into their tables.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;

mod client;

pub use client::*;
