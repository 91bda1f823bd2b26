//! Normalization of raw store records into `CalendarEvent`s.
//!
//! These functions are pure. A record whose date cannot be resolved to a
//! calendar day yields `None` rather than an error; the aggregator counts
//! the drop and carries on. Kind-specific defaults are applied here: form
//! due-dates default to 23:59 at "Online Form", announcements to 09:00 at
//! "Announcement".

use chrono::NaiveTime;

use crate::event::{CalendarEvent, EventKind, SourceRef, Visibility};
use crate::raw::{RawAnnouncement, RawEvent, RawForm, RawRecord};

/// Fallback title when a source record has none.
const UNTITLED: &str = "(Untitled)";

/// Normalize a raw record from any of the three sources.
pub fn normalize(record: &RawRecord) -> Option<CalendarEvent> {
    match record {
        RawRecord::Event(raw) => normalize_event(raw),
        RawRecord::Form(raw) => normalize_form(raw),
        RawRecord::Announcement(raw) => normalize_announcement(raw),
    }
}

/// A plain event keeps its own id, time and location.
pub fn normalize_event(raw: &RawEvent) -> Option<CalendarEvent> {
    let date = raw.date.as_ref()?.resolve()?;

    Some(CalendarEvent {
        id: raw.id.clone(),
        kind: EventKind::Event,
        title: title_or_untitled(raw.title.as_deref()),
        description: raw.description.clone(),
        date,
        time: raw.time.as_deref().and_then(parse_time),
        location: raw.location.clone(),
        visibility: parse_visibility(raw.visibility.as_deref()),
        created_by: raw.created_by.clone(),
        group_id: raw.group_id.clone(),
        source: None,
    })
}

/// A form with a due date becomes a `form-<id>` entry, due at end of day
/// unless the form carries its own due time.
pub fn normalize_form(raw: &RawForm) -> Option<CalendarEvent> {
    let date = raw.due_date.as_ref()?.resolve()?;

    Some(CalendarEvent {
        id: format!("form-{}", raw.id),
        kind: EventKind::FormDue,
        title: format!("Form Due: {}", title_or_untitled(raw.title.as_deref())),
        description: raw.description.clone(),
        date,
        time: raw
            .due_time
            .as_deref()
            .and_then(parse_time)
            .or(NaiveTime::from_hms_opt(23, 59, 0)),
        location: Some("Online Form".to_string()),
        visibility: parse_visibility(raw.visibility.as_deref()),
        created_by: raw.created_by.clone(),
        group_id: raw.group_id.clone(),
        source: Some(SourceRef::Form {
            form_id: raw.id.clone(),
        }),
    })
}

/// A scheduled announcement becomes an `announcement-<id>` entry at the
/// start of the school day unless it carries its own time.
pub fn normalize_announcement(raw: &RawAnnouncement) -> Option<CalendarEvent> {
    let date = raw.scheduled_date.as_ref()?.resolve()?;

    Some(CalendarEvent {
        id: format!("announcement-{}", raw.id),
        kind: EventKind::Announcement,
        title: title_or_untitled(raw.title.as_deref()),
        description: raw.content.clone(),
        date,
        time: raw
            .scheduled_time
            .as_deref()
            .and_then(parse_time)
            .or(NaiveTime::from_hms_opt(9, 0, 0)),
        location: Some("Announcement".to_string()),
        visibility: parse_visibility(raw.visibility.as_deref()),
        created_by: raw.created_by.clone(),
        group_id: raw.group_id.clone(),
        source: Some(SourceRef::Announcement {
            announcement_id: raw.id.clone(),
        }),
    })
}

fn title_or_untitled(title: Option<&str>) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => UNTITLED.to_string(),
    }
}

/// Times come over the wire as `"HH:MM"`; anything else is ignored and
/// the kind default applies.
fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()
}

/// The store's `type` field: `"private"` restricts, anything else (or a
/// missing field) is public.
fn parse_visibility(raw: Option<&str>) -> Visibility {
    match raw {
        Some("private") => Visibility::Private,
        _ => Visibility::Public,
    }
}
