//! Unified calendar event types.
//!
//! Everything that can appear on the portal calendar (plain events, form
//! due-dates, scheduled announcements) is normalized into one
//! `CalendarEvent` shape. Events are never persisted in this form: they
//! are recomputed from the three source collections on every aggregation
//! pass and live only for the duration of a page view.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Which source a calendar entry came from. Determines the display
/// category, edit/delete eligibility and per-kind defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Event,
    FormDue,
    Announcement,
}

/// Who can see an event. Inherited from the source record's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Back-reference from a derived event to its originating record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceRef {
    Form { form_id: String },
    Announcement { announcement_id: String },
}

/// A unified calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Globally unique. Derived events are prefixed (`form-<id>`,
    /// `announcement-<id>`) so they never collide with native event ids
    /// and their provenance is visible from the id shape.
    pub id: String,
    pub kind: EventKind,
    pub title: String,
    pub description: Option<String>,
    /// The calendar day this entry lands on.
    pub date: NaiveDate,
    /// Wall-clock time of day. `None` sorts before any set time.
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub visibility: Visibility,
    /// Owning user; edit/delete is creator-only.
    pub created_by: String,
    /// Group association, used for filtering and membership display.
    pub group_id: Option<String>,
    /// Set for derived events only.
    pub source: Option<SourceRef>,
}

impl CalendarEvent {
    /// Derived events come from a form or announcement and can only be
    /// changed through their source record.
    pub fn is_derived(&self) -> bool {
        self.source.is_some()
    }

    /// Whether the given user may edit or delete this entry directly.
    pub fn can_edit(&self, user_id: &str) -> bool {
        !self.is_derived() && self.created_by == user_id
    }

    /// Sort key for the combined list: `(date, time)` ascending.
    pub fn sort_key(&self) -> (NaiveDate, Option<NaiveTime>) {
        (self.date, self.time)
    }

    /// Canonical `YYYY-MM-DD` form of the event's day.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
