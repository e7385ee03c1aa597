//! Durable storage for the fasting document.
//!
//! The store is a plain I/O boundary: it knows how to read and write one
//! [`AppState`](crate::fast::AppState) and nothing about fasting rules.

pub mod error;
pub mod fasting;
pub mod file;

pub use error::{StorageError, StorageResult};
pub use fasting::FastStore;
