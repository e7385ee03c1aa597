//! Start/end transitions between the idle and fasting states.
//!
//! Every check runs before any field is touched, so a failed transition
//! leaves the `AppState` exactly as it was.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::model::{ActiveFast, AppState, CompletedFast};

/// Rejected transitions and inputs.
///
/// The `Display` text is user-facing and is shown as-is by the web pages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FastError {
    /// A fast is already running.
    #[error("A fast is already in progress")]
    AlreadyActive,

    /// There is no running fast to end.
    #[error("No fast in progress")]
    NoActiveFast,

    /// The goal was not a non-negative whole number of hours.
    #[error("Goal must be a non-negative number")]
    InvalidInput { input: String },
}

impl FastError {
    fn invalid(input: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.into(),
        }
    }
}

// ============================================================================
// Goal input
// ============================================================================

/// Parse a goal as typed into a form field.
///
/// Absent or blank input means "no goal", as does `0`.
pub fn parse_goal(raw: Option<&str>) -> Result<Option<u32>, FastError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    raw.parse::<u32>()
        .map(normalize_goal)
        .map_err(|_| FastError::invalid(raw))
}

/// Validate a goal received as a JSON number.
pub fn goal_from_hours(hours: Option<i64>) -> Result<Option<u32>, FastError> {
    match hours {
        None => Ok(None),
        Some(h) => u32::try_from(h)
            .map(normalize_goal)
            .map_err(|_| FastError::invalid(h.to_string())),
    }
}

fn normalize_goal(goal: u32) -> Option<u32> {
    (goal > 0).then_some(goal)
}

// ============================================================================
// Transitions
// ============================================================================

impl AppState {
    /// Begin a new fast at `now`.
    ///
    /// Fails with [`FastError::AlreadyActive`] if one is already running.
    /// History is never touched.
    pub fn start_fast(
        &mut self,
        goal_hours: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<&ActiveFast, FastError> {
        if self.current_fast.is_some() {
            return Err(FastError::AlreadyActive);
        }

        Ok(&*self.current_fast.insert(ActiveFast {
            start_time: now,
            goal_hours: goal_hours.and_then(normalize_goal),
        }))
    }

    /// End the running fast at `now` and prepend it to history.
    ///
    /// Fails with [`FastError::NoActiveFast`] when idle.
    pub fn end_fast(&mut self, now: DateTime<Utc>) -> Result<CompletedFast, FastError> {
        let active = self.current_fast.take().ok_or(FastError::NoActiveFast)?;

        let completed = active.complete(now);
        self.fasting_history.insert(0, completed.clone());
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
    }

    fn completed(hours_ago: i64, duration: f64) -> CompletedFast {
        CompletedFast {
            start_time: t0() - TimeDelta::hours(hours_ago),
            goal_hours: None,
            duration_hours: duration,
        }
    }

    // ------------------------------------------------------------------------
    // Goal parsing
    // ------------------------------------------------------------------------

    #[test]
    fn parse_goal_accepts_whole_hours() {
        assert_eq!(parse_goal(Some("16")), Ok(Some(16)));
        assert_eq!(parse_goal(Some(" 18 ")), Ok(Some(18)));
    }

    #[test]
    fn parse_goal_blank_or_zero_means_no_goal() {
        assert_eq!(parse_goal(None), Ok(None));
        assert_eq!(parse_goal(Some("")), Ok(None));
        assert_eq!(parse_goal(Some("   ")), Ok(None));
        assert_eq!(parse_goal(Some("0")), Ok(None));
    }

    #[test]
    fn parse_goal_rejects_negative_and_non_numeric() {
        for raw in ["-1", "abc", "12.5", "1e3"] {
            let err = parse_goal(Some(raw)).unwrap_err();
            assert!(matches!(err, FastError::InvalidInput { .. }), "{raw}");
        }
    }

    #[test]
    fn goal_from_hours_validates_range() {
        assert_eq!(goal_from_hours(None), Ok(None));
        assert_eq!(goal_from_hours(Some(0)), Ok(None));
        assert_eq!(goal_from_hours(Some(24)), Ok(Some(24)));
        assert!(goal_from_hours(Some(-2)).is_err());
        assert!(goal_from_hours(Some(i64::MAX)).is_err());
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            FastError::AlreadyActive.to_string(),
            "A fast is already in progress"
        );
        assert_eq!(
            FastError::invalid("x").to_string(),
            "Goal must be a non-negative number"
        );
        assert_eq!(FastError::NoActiveFast.to_string(), "No fast in progress");
    }

    // ------------------------------------------------------------------------
    // Start
    // ------------------------------------------------------------------------

    #[test]
    fn start_when_idle_sets_current_fast() {
        let mut state = AppState::default();
        let fast = state.start_fast(Some(16), t0()).unwrap();
        assert_eq!(fast.start_time, t0());
        assert_eq!(fast.goal_hours, Some(16));

        let current = state.current_fast.as_ref().unwrap();
        assert_eq!(current.start_time, t0());
        assert!(state.fasting_history.is_empty());
    }

    #[test]
    fn start_without_goal() {
        let mut state = AppState::default();
        state.start_fast(None, t0()).unwrap();
        assert_eq!(state.current_fast.unwrap().goal_hours, None);
    }

    #[test]
    fn start_normalizes_zero_goal() {
        let mut state = AppState::default();
        state.start_fast(Some(0), t0()).unwrap();
        assert_eq!(state.current_fast.unwrap().goal_hours, None);
    }

    #[test]
    fn start_when_active_fails_and_leaves_state_unchanged() {
        let mut state = AppState::default();
        state.fasting_history.push(completed(48, 16.0));
        state.start_fast(Some(16), t0()).unwrap();
        let before = state.clone();

        let err = state
            .start_fast(Some(20), t0() + TimeDelta::hours(1))
            .unwrap_err();
        assert_eq!(err, FastError::AlreadyActive);
        assert_eq!(state, before);
    }

    #[test]
    fn start_does_not_touch_history() {
        let mut state = AppState::default();
        state.fasting_history = vec![completed(72, 18.0), completed(96, 12.0)];
        let history = state.fasting_history.clone();

        state.start_fast(None, t0()).unwrap();
        assert_eq!(state.fasting_history, history);
    }

    // ------------------------------------------------------------------------
    // End
    // ------------------------------------------------------------------------

    #[test]
    fn end_when_idle_fails_and_leaves_state_unchanged() {
        let mut state = AppState::default();
        state.fasting_history.push(completed(48, 16.0));
        let before = state.clone();

        let err = state.end_fast(t0()).unwrap_err();
        assert_eq!(err, FastError::NoActiveFast);
        assert_eq!(state, before);
    }

    #[test]
    fn end_moves_fast_to_front_of_history() {
        let mut state = AppState::default();
        state.fasting_history = vec![completed(48, 16.0), completed(96, 14.0)];
        state.start_fast(Some(16), t0()).unwrap();

        let done = state.end_fast(t0() + TimeDelta::hours(17)).unwrap();

        assert!(state.current_fast.is_none());
        assert_eq!(state.fasting_history.len(), 3);
        assert_eq!(state.fasting_history[0], done);
        assert_eq!(done.start_time, t0());
        assert_eq!(done.goal_hours, Some(16));
        assert!((done.duration_hours - 17.0).abs() < 1e-9);
        assert_eq!(state.fasting_history[1].duration_hours, 16.0);
        assert_eq!(state.fasting_history[2].duration_hours, 14.0);
    }

    #[test]
    fn end_computes_fractional_duration() {
        let mut state = AppState::default();
        state.start_fast(None, t0()).unwrap();
        let done = state
            .end_fast(t0() + TimeDelta::hours(12) + TimeDelta::minutes(45))
            .unwrap();
        assert!((done.duration_hours - 12.75).abs() < 1e-9);
    }

    #[test]
    fn machine_cycles_between_idle_and_active() {
        let mut state = AppState::default();
        for round in 0..3 {
            let start = t0() + TimeDelta::days(round);
            state.start_fast(Some(14), start).unwrap();
            assert!(state.is_active());
            state.end_fast(start + TimeDelta::hours(15)).unwrap();
            assert!(!state.is_active());
        }

        assert_eq!(state.fasting_history.len(), 3);
        // newest first
        assert!(state.fasting_history[0].start_time > state.fasting_history[1].start_time);
        assert!(state.fasting_history[1].start_time > state.fasting_history[2].start_time);
    }
}
