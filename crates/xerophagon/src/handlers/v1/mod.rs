//! JSON API, version 1.

mod fasts;

pub use fasts::{end_fast, get_history, get_state, start_fast};
