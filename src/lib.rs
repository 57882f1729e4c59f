//! Intentionally vulnerable web server for classroom security demos - Library exports for testing
//!
//! Every XSS and SQL injection route has a safe counterpart. Do not expose this server publicly.
//!
//! (c) vulnlab contributors 2026

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod logging;
pub mod server;
