//! Persisted fasting document.
//!
//! The wire shape is a single JSON object:
//!
//! ```text
//! {
//!   "current_fast": { "start_time": "...", "goal_hours": 16 } | null,
//!   "fasting_history": [
//!     { "start_time": "...", "goal_hours": 16, "duration_hours": 17.0 }
//!   ]
//! }
//! ```
//!
//! `goal_hours` and `duration_hours` are omitted when unset or zero, and read
//! back as unset/zero when missing.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// AppState
// ============================================================================

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// The single in-progress fast, if any.
    #[serde(default)]
    pub current_fast: Option<ActiveFast>,

    /// Completed fasts, newest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fasting_history: Vec<CompletedFast>,
}

/// Whether a fast is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FastStatus {
    Idle,
    Active,
}

impl AppState {
    pub fn status(&self) -> FastStatus {
        if self.current_fast.is_some() {
            FastStatus::Active
        } else {
            FastStatus::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.current_fast.is_some()
    }
}

// ============================================================================
// Fasts
// ============================================================================

/// A fast that has started but not ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFast {
    pub start_time: DateTime<Utc>,

    #[serde(
        default,
        skip_serializing_if = "goal_is_unset",
        deserialize_with = "goal_from_wire"
    )]
    pub goal_hours: Option<u32>,
}

impl ActiveFast {
    /// Fractional hours elapsed between the start and `now`.
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        hours_between(self.start_time, now)
    }

    /// Close this fast at `now`, keeping its start time and goal.
    pub fn complete(self, now: DateTime<Utc>) -> CompletedFast {
        CompletedFast {
            duration_hours: self.elapsed_hours(now),
            start_time: self.start_time,
            goal_hours: self.goal_hours,
        }
    }
}

/// A fast that has ended and been moved into history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedFast {
    pub start_time: DateTime<Utc>,

    #[serde(
        default,
        skip_serializing_if = "goal_is_unset",
        deserialize_with = "goal_from_wire"
    )]
    pub goal_hours: Option<u32>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub duration_hours: f64,
}

impl CompletedFast {
    /// Whether the recorded duration reached the goal. `None` without a goal.
    pub fn goal_reached(&self) -> Option<bool> {
        self.goal_hours
            .map(|goal| self.duration_hours >= f64::from(goal))
    }
}

/// Elapsed wall-clock time in fractional hours, floored at zero.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let delta = end - start;
    if delta <= TimeDelta::zero() {
        return 0.0;
    }
    match delta.num_microseconds() {
        Some(us) => us as f64 / 3_600_000_000.0,
        None => delta.num_milliseconds() as f64 / 3_600_000.0,
    }
}

// ============================================================================
// Serde helpers
// ============================================================================

fn goal_is_unset(goal: &Option<u32>) -> bool {
    matches!(goal, None | Some(0))
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// A stored `0` means "no goal".
fn goal_from_wire<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.filter(|&goal| goal > 0))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
