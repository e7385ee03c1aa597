//! Fasting commands that operate on the data file directly.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use xerophagon::fast::{FastingStage, paginate, parse_goal};
use xerophagon::views::{ActiveFastView, HistoryRow};

/// Print the current fast and one page of history.
pub async fn status(config_path: &str, data_override: Option<&Path>, page: usize) -> Result<()> {
    let (config, tracker) = super::open_tracker(config_path, data_override).await?;
    let data = tracker.snapshot().await?;
    let now = Utc::now();

    match &data.current_fast {
        Some(fast) => {
            let view = ActiveFastView::new(fast, now);
            println!("Fasting since {} ({} elapsed)", view.start_time, view.elapsed);
            if let Some(goal) = view.goal_hours {
                println!("Goal: {goal}h");
            }
            println!("Stage: {} - {}", view.stage_name, view.stage_description);
        }
        None => println!("Not fasting."),
    }

    if data.fasting_history.is_empty() {
        return Ok(());
    }

    let page = paginate(&data.fasting_history, page, config.history.page_size.max(1));

    println!();
    println!(
        "History (page {} of {}):",
        page.current_page, page.total_pages
    );
    println!("{:<20} {:>10} {:>6} {:>8}", "STARTED", "HOURS", "GOAL", "REACHED");
    println!("{:-<20} {:->10} {:->6} {:->8}", "", "", "", "");

    for row in page.items.iter().map(HistoryRow::from) {
        let goal = row.goal_hours.map(|g| g.to_string()).unwrap_or_default();
        println!(
            "{:<20} {:>10} {:>6} {:>8}",
            row.start_time, row.duration, goal, row.goal_reached
        );
    }

    Ok(())
}

/// Start a fast at the current time.
pub async fn start(
    config_path: &str,
    data_override: Option<&Path>,
    goal: Option<&str>,
) -> Result<()> {
    let goal_hours = parse_goal(goal)?;
    let (_, tracker) = super::open_tracker(config_path, data_override).await?;

    let fast = tracker.start_fast(goal_hours, Utc::now()).await?;

    let view = ActiveFastView::new(&fast, Utc::now());
    match fast.goal_hours {
        Some(goal) => println!("Started fasting at {} with a {goal}h goal.", view.start_time),
        None => println!("Started fasting at {}.", view.start_time),
    }
    Ok(())
}

/// End the current fast at the current time.
pub async fn end(config_path: &str, data_override: Option<&Path>) -> Result<()> {
    let (_, tracker) = super::open_tracker(config_path, data_override).await?;

    let fast = tracker.end_fast(Utc::now()).await?;

    let stage = FastingStage::for_elapsed(fast.duration_hours);
    println!(
        "Fast ended after {:.1} hours (reached {}).",
        fast.duration_hours, stage.name
    );
    match fast.goal_reached() {
        Some(true) => println!("Goal reached."),
        Some(false) => println!("Goal not reached."),
        None => {}
    }
    Ok(())
}
