//! Fasting sessions: the persisted model, the idle/active state machine,
//! history pagination and the single-writer tracker that ties them to a store.

mod machine;
mod model;
pub mod page;
pub mod stage;
mod tracker;

pub use machine::{FastError, goal_from_hours, parse_goal};
pub use model::{ActiveFast, AppState, CompletedFast, FastStatus, hours_between};
pub use page::{DEFAULT_PAGE_SIZE, Page, paginate, parse_page};
pub use stage::FastingStage;
pub use tracker::{FastTracker, TrackerError};
