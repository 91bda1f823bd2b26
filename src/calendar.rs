//! Month-grid calendar component.
//!
//! `MonthCalendar` owns the viewed `(year, month)` and a date-keyed event
//! lookup. `grid()` computes a complete-weeks month grid for the
//! rendering host; navigation and day selection are plain methods
//! returning values, so the host can wire them to whatever input
//! mechanism it uses. Multiple instances (full view plus mini sidebar)
//! hold independent state and are kept in sync by the caller.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Local, NaiveDate};
use schoolcal_core::{CalendarEvent, EventKind};

/// Month paging direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

/// One cell of the month grid.
#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Real day-of-month number, also on padding cells.
    pub day: u32,
    /// Whether the cell belongs to the viewed month (padding otherwise).
    pub in_month: bool,
    pub is_today: bool,
    /// Events on this day, in aggregate order.
    pub events: Vec<CalendarEvent>,
    // Presentation flags derived from the kinds present on this day. A
    // single day can carry more than one.
    pub has_events: bool,
    pub has_announcement: bool,
    pub has_form_due: bool,
}

/// A complete-weeks grid for one viewed month.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    /// 1-indexed month.
    pub month: u32,
    /// Always a multiple of 7 cells, Sunday-first.
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Iterate the grid one week row (7 cells) at a time.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

/// The signal emitted when an in-month day is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub date: NaiveDate,
    /// Canonical `YYYY-MM-DD` form of the selected day.
    pub date_string: String,
}

/// Group events by calendar day for grid lookups and day views.
pub fn events_by_date(events: &[CalendarEvent]) -> HashMap<NaiveDate, Vec<CalendarEvent>> {
    let mut map: HashMap<NaiveDate, Vec<CalendarEvent>> = HashMap::new();
    for event in events {
        map.entry(event.date).or_default().push(event.clone());
    }
    map
}

/// A month-view calendar instance.
pub struct MonthCalendar {
    year: i32,
    month: u32,
    events_by_date: HashMap<NaiveDate, Vec<CalendarEvent>>,
    mini: bool,
}

impl MonthCalendar {
    /// Start viewing the given month (1-indexed). Out-of-range months
    /// are clamped into the calendar year.
    pub fn new(year: i32, month: u32) -> Self {
        MonthCalendar {
            year,
            month: month.clamp(1, 12),
            events_by_date: HashMap::new(),
            mini: false,
        }
    }

    /// Start viewing the current local month.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        MonthCalendar::new(today.year(), today.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Page one month forward or back, rolling the year over at the
    /// December/January edges.
    pub fn navigate(&mut self, direction: NavDirection) {
        match direction {
            NavDirection::Next => {
                if self.month == 12 {
                    self.month = 1;
                    self.year += 1;
                } else {
                    self.month += 1;
                }
            }
            NavDirection::Prev => {
                if self.month == 1 {
                    self.month = 12;
                    self.year -= 1;
                } else {
                    self.month -= 1;
                }
            }
        }
    }

    /// Replace the event lookup wholesale. The viewed month is kept.
    pub fn set_events(&mut self, events: &[CalendarEvent]) {
        self.events_by_date = events_by_date(events);
    }

    /// Reduced-density presentation toggle. No effect on the event
    /// model, filtering or selection.
    pub fn set_mini_mode(&mut self, enabled: bool) {
        self.mini = enabled;
    }

    pub fn mini_mode(&self) -> bool {
        self.mini
    }

    /// Compute the grid for the viewed month against local "today".
    pub fn grid(&self) -> MonthGrid {
        self.grid_on(Local::now().date_naive())
    }

    /// Same as `grid`, with an explicit "today" marker.
    pub fn grid_on(&self, today: NaiveDate) -> MonthGrid {
        build_grid(self.year, self.month, &self.events_by_date, today)
    }

    /// Activate a day cell. Padding cells from adjacent months are not
    /// selectable and yield no signal.
    pub fn select_day(&self, cell: &DayCell) -> Option<Selection> {
        if !cell.in_month {
            return None;
        }
        Some(Selection {
            date: cell.date,
            date_string: cell.date.format("%Y-%m-%d").to_string(),
        })
    }
}

/// Build the complete-weeks grid for one month.
///
/// Leading cells come from the end of the previous month, trailing cells
/// from the start of the next, each carrying its real day-of-month
/// number. Weeks start on Sunday.
pub fn build_grid(
    year: i32,
    month: u32,
    events_by_date: &HashMap<NaiveDate, Vec<CalendarEvent>>,
    today: NaiveDate,
) -> MonthGrid {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthGrid {
            year,
            month,
            cells: Vec::new(),
        };
    };
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let Some(next_first) = next_first else {
        return MonthGrid {
            year,
            month,
            cells: Vec::new(),
        };
    };

    let leading = first.weekday().num_days_from_sunday() as i64;
    let days = (next_first - first).num_days();
    let total = (leading + days + 6) / 7 * 7;

    let mut cells = Vec::with_capacity(total as usize);
    for offset in 0..total {
        let date = first + Duration::days(offset - leading);
        let in_month = date >= first && date < next_first;
        cells.push(day_cell(date, in_month, today, events_by_date));
    }

    MonthGrid { year, month, cells }
}

fn day_cell(
    date: NaiveDate,
    in_month: bool,
    today: NaiveDate,
    lookup: &HashMap<NaiveDate, Vec<CalendarEvent>>,
) -> DayCell {
    let events = lookup.get(&date).cloned().unwrap_or_default();
    DayCell {
        date,
        day: date.day(),
        in_month,
        is_today: in_month && date == today,
        has_events: events.iter().any(|e| e.kind == EventKind::Event),
        has_announcement: events.iter().any(|e| e.kind == EventKind::Announcement),
        has_form_due: events.iter().any(|e| e.kind == EventKind::FormDue),
        events,
    }
}
