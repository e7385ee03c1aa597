//! Xerophagon - a small self-hosted tracker for intermittent fasting.

pub mod build_info;
pub mod config;
pub mod fast;
pub mod handlers;
pub mod server;
pub mod store;
pub mod views;
