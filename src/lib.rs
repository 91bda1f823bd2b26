//! schoolcal: unified calendar engine for the school community portal.
//!
//! The portal shows one calendar built from three heterogeneous sources:
//! plain events, form due-dates and scheduled announcements. This crate
//! fetches the three sources concurrently, normalizes them into one
//! `CalendarEvent` shape, deduplicates and sorts them, and computes
//! month-grid views for rendering hosts. Persistence, authorization and
//! UI painting live behind the injected collaborator traits.

pub mod aggregate;
pub mod calendar;
pub mod filter;
pub mod identity;
pub mod poll;

// Re-export schoolcal_core so hosts only depend on one crate
pub use schoolcal_core as core;
pub use schoolcal_core::{
    CalendarEvent, EventKind, FetchError, RawAnnouncement, RawDate, RawEvent, RawForm,
    SourceRef, Visibility,
};

pub use aggregate::{aggregate, AggregateResult, EventSource, Source, SourceFailure};
pub use calendar::{
    build_grid, events_by_date, DayCell, MonthCalendar, MonthGrid, NavDirection, Selection,
};
pub use filter::{
    filter_by_group, filter_by_window, filter_by_window_on, search, upcoming, upcoming_on,
    TimeWindow,
};
pub use identity::{Identity, UserContext};
pub use poll::{NotificationFeed, NotificationPoller, PollerConfig};
