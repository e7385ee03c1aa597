//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and rendered with tera. All values
//! are pre-formatted here so templates stay free of logic beyond loops and
//! conditionals.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tera::{Context, Tera};

use crate::fast::{ActiveFast, AppState, CompletedFast, FastingStage, Page, stage};

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const FASTING_TEMPLATE: &str = include_str!("../templates/fasting.html");
const PROFILE_TEMPLATE: &str = include_str!("../templates/profile.html");

/// Hours shown on the fasting dot grid when no longer goal applies.
const MIN_DOT_HOURS: u32 = 24;
/// Upper bound on the dot grid (one week).
const MAX_DOT_HOURS: u32 = 168;

// ============================================================================
// View models
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ActiveFastView {
    pub start_time: String,
    pub start_unix: i64,
    pub goal_hours: Option<u32>,
    pub elapsed: String,
    pub stage_name: &'static str,
    pub stage_description: &'static str,
    pub stage_class: String,
}

impl ActiveFastView {
    pub fn new(fast: &ActiveFast, now: DateTime<Utc>) -> Self {
        let elapsed_hours = fast.elapsed_hours(now);
        let stage = FastingStage::for_elapsed(elapsed_hours);
        Self {
            start_time: format_local(fast.start_time),
            start_unix: fast.start_time.timestamp(),
            goal_hours: fast.goal_hours,
            elapsed: format_clock(elapsed_hours),
            stage_name: stage.name,
            stage_description: stage.description,
            stage_class: stage.css_class(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub start_time: String,
    pub duration: String,
    pub goal_hours: Option<u32>,
    /// `"yes"`, `"no"`, or empty when no goal was set.
    pub goal_reached: &'static str,
}

impl From<&CompletedFast> for HistoryRow {
    fn from(fast: &CompletedFast) -> Self {
        Self {
            start_time: format_local(fast.start_time),
            duration: format!("{:.1}", fast.duration_hours),
            goal_hours: fast.goal_hours,
            goal_reached: match fast.goal_reached() {
                Some(true) => "yes",
                Some(false) => "no",
                None => "",
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FastingView {
    pub tab: &'static str,
    pub current_fast: Option<ActiveFastView>,
    pub error_message: Option<String>,
    pub dot_hours: Vec<u32>,
    pub stages: &'static [FastingStage],
}

impl FastingView {
    pub fn new(state: &AppState, error_message: Option<String>, now: DateTime<Utc>) -> Self {
        let dot_hours = state
            .current_fast
            .as_ref()
            .map(|fast| (0..dot_grid_len(fast, now)).collect())
            .unwrap_or_default();

        Self {
            tab: "fasting",
            current_fast: state
                .current_fast
                .as_ref()
                .map(|fast| ActiveFastView::new(fast, now)),
            error_message: error_message.filter(|m| !m.is_empty()),
            dot_hours,
            stages: stage::STAGES,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub tab: &'static str,
    pub current_fast: Option<ActiveFastView>,
    pub history: Vec<HistoryRow>,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: usize,
    pub next_page: usize,
    pub pages: Vec<usize>,
}

impl ProfileView {
    pub fn new(state: &AppState, page: &Page<'_, CompletedFast>, now: DateTime<Utc>) -> Self {
        Self {
            tab: "profile",
            current_fast: state
                .current_fast
                .as_ref()
                .map(|fast| ActiveFastView::new(fast, now)),
            history: page.items.iter().map(HistoryRow::from).collect(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            has_prev: page.has_prev,
            has_next: page.has_next,
            prev_page: page.current_page.saturating_sub(1).max(1),
            next_page: page.current_page.saturating_add(1),
            pages: (1..=page.total_pages).collect(),
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Compiled page templates. Cheap to clone.
#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("fasting.html", FASTING_TEMPLATE),
            ("profile.html", PROFILE_TEMPLATE),
        ])?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn fasting(&self, view: &FastingView) -> Result<String, tera::Error> {
        self.render("fasting.html", view)
    }

    pub fn profile(&self, view: &ProfileView) -> Result<String, tera::Error> {
        self.render("profile.html", view)
    }

    fn render(&self, template: &str, view: &impl Serialize) -> Result<String, tera::Error> {
        let context = Context::from_serialize(view)?;
        self.tera.render(template, &context)
    }
}

// ============================================================================
// Formatting
// ============================================================================

fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// `HH:MM:SS` for a number of fractional hours.
fn format_clock(hours: f64) -> String {
    let total_seconds = (hours * 3600.0).max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

fn dot_grid_len(fast: &ActiveFast, now: DateTime<Utc>) -> u32 {
    let elapsed = fast.elapsed_hours(now).floor().min(f64::from(MAX_DOT_HOURS)) as u32;
    fast.goal_hours
        .unwrap_or(0)
        .max(MIN_DOT_HOURS)
        .max(elapsed + 1)
        .min(MAX_DOT_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast::paginate;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
    }

    fn active(goal_hours: Option<u32>) -> AppState {
        AppState {
            current_fast: Some(ActiveFast {
                start_time: t0(),
                goal_hours,
            }),
            fasting_history: vec![],
        }
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0.0), "00:00:00");
        assert_eq!(format_clock(1.5), "01:30:00");
        assert_eq!(format_clock(100.0 + 1.0 / 3600.0), "100:00:01");
    }

    #[test]
    fn dot_grid_covers_goal_and_elapsed() {
        let fast = ActiveFast {
            start_time: t0(),
            goal_hours: Some(36),
        };
        assert_eq!(dot_grid_len(&fast, t0()), 36);

        let fast = ActiveFast {
            start_time: t0(),
            goal_hours: None,
        };
        assert_eq!(dot_grid_len(&fast, t0()), 24);
        assert_eq!(dot_grid_len(&fast, t0() + TimeDelta::hours(30)), 31);
        assert_eq!(dot_grid_len(&fast, t0() + TimeDelta::days(30)), 168);
    }

    #[test]
    fn render_idle_fasting_page_shows_start_form() {
        let views = Views::new().unwrap();
        let html = views
            .fasting(&FastingView::new(&AppState::default(), None, t0()))
            .unwrap();
        assert!(html.contains(r#"action="/start_fast""#));
        assert!(!html.contains("id=\"current-fast\""));
        assert!(!html.contains("script.js"));
    }

    #[test]
    fn render_active_fasting_page() {
        let views = Views::new().unwrap();
        let state = active(Some(16));
        let html = views
            .fasting(&FastingView::new(
                &state,
                None,
                t0() + TimeDelta::hours(13),
            ))
            .unwrap();
        assert!(html.contains(&format!(r#"data-start-time="{}""#, t0().timestamp())));
        assert!(html.contains("13:00:00"));
        assert!(html.contains("Goal: 16 hours"));
        assert!(html.contains("Ketosis phase"));
        assert!(html.contains(r#"action="/end_fast""#));
        assert!(html.contains("/static/js/script.js"));
    }

    #[test]
    fn render_escapes_error_message() {
        let views = Views::new().unwrap();
        let html = views
            .fasting(&FastingView::new(
                &AppState::default(),
                Some("<script>alert(1)</script>".to_string()),
                t0(),
            ))
            .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn render_profile_with_history() {
        let views = Views::new().unwrap();
        let history: Vec<CompletedFast> = (0..7)
            .map(|i| CompletedFast {
                start_time: t0() - TimeDelta::days(i),
                goal_hours: if i % 2 == 0 { Some(16) } else { None },
                duration_hours: 15.0 + i as f64 * 0.5,
            })
            .collect();
        let state = AppState {
            current_fast: None,
            fasting_history: history,
        };

        let page = paginate(&state.fasting_history, 2, 5);
        let view = ProfileView::new(&state, &page, t0());
        assert_eq!(view.history.len(), 2);
        assert_eq!(view.pages, vec![1, 2]);
        assert_eq!(view.prev_page, 1);

        let html = views.profile(&view).unwrap();
        assert!(html.contains("17.5 h"));
        assert!(html.contains("Goal reached"));
        assert!(html.contains(r#"href="/profile?page=1">Previous"#));
        assert!(!html.contains("Next"));
    }

    #[test]
    fn render_empty_profile() {
        let views = Views::new().unwrap();
        let state = AppState::default();
        let page = paginate(&state.fasting_history, 1, 5);
        let html = views.profile(&ProfileView::new(&state, &page, t0())).unwrap();
        assert!(html.contains("No completed fasts yet."));
    }
}
