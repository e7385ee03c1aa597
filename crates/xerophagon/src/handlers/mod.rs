//! HTTP request handlers.

mod assets;
mod health;
mod pages;
pub(crate) mod problem_details;
mod query;
pub mod v1;
mod version;

pub use assets::script;
pub use health::livez;
pub use pages::{end_fast, fasting, home, profile, start_fast};
pub use version::version;
