//! List-view filtering and search over aggregated events.
//!
//! All functions here are pure over their inputs; the window filters that
//! depend on "now" take it from the local clock at call time and have
//! `_on` variants with an explicit day for tests and fixed-date hosts.

use chrono::{Datelike, Duration, Local, NaiveDate};
use schoolcal_core::CalendarEvent;

/// Named time-window predicates for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    All,
    Upcoming,
    Past,
    Today,
    /// Most recent Sunday through the following Saturday.
    ThisWeek,
    ThisMonth,
}

/// Keep events belonging to the given group. `None` or an empty id
/// passes the list through unfiltered.
pub fn filter_by_group(events: &[CalendarEvent], group_id: Option<&str>) -> Vec<CalendarEvent> {
    match group_id {
        None => events.to_vec(),
        Some(id) if id.is_empty() => events.to_vec(),
        Some(id) => events
            .iter()
            .filter(|e| e.group_id.as_deref() == Some(id))
            .cloned()
            .collect(),
    }
}

/// Filter by a named time window against the local calendar day.
pub fn filter_by_window(events: &[CalendarEvent], window: TimeWindow) -> Vec<CalendarEvent> {
    filter_by_window_on(events, window, Local::now().date_naive())
}

/// Same as `filter_by_window`, with an explicit "today".
pub fn filter_by_window_on(
    events: &[CalendarEvent],
    window: TimeWindow,
    today: NaiveDate,
) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|e| window_contains(window, e.date, today))
        .cloned()
        .collect()
}

fn window_contains(window: TimeWindow, date: NaiveDate, today: NaiveDate) -> bool {
    match window {
        TimeWindow::All => true,
        TimeWindow::Upcoming => date >= today,
        TimeWindow::Past => date < today,
        TimeWindow::Today => date == today,
        TimeWindow::ThisWeek => {
            let week_start =
                today - Duration::days(today.weekday().num_days_from_sunday() as i64);
            let week_end = week_start + Duration::days(6);
            date >= week_start && date <= week_end
        }
        TimeWindow::ThisMonth => date.year() == today.year() && date.month() == today.month(),
    }
}

/// Case-insensitive substring search over title, description and
/// location. A blank term passes the input through unfiltered.
pub fn search(events: &[CalendarEvent], term: &str) -> Vec<CalendarEvent> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return events.to_vec();
    }
    events
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(&term)
                || e.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
                || e.location
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

/// The next `limit` events on or after today, keeping the list's order.
/// Expects the already-sorted aggregate output.
pub fn upcoming(events: &[CalendarEvent], limit: usize) -> Vec<CalendarEvent> {
    upcoming_on(events, limit, Local::now().date_naive())
}

/// Same as `upcoming`, with an explicit "today".
pub fn upcoming_on(
    events: &[CalendarEvent],
    limit: usize,
    today: NaiveDate,
) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|e| e.date >= today)
        .take(limit)
        .cloned()
        .collect()
}
