//! Raw source records as fetched from the document store.
//!
//! Field names mirror the store's camelCase documents. Dates arrive in
//! three shapes depending on which client wrote the record; `RawDate`
//! models that closed set explicitly so every call site goes through one
//! resolution path.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// The three date shapes the store can hand us.
///
/// Variant order matters for untagged deserialization: a `{seconds}` map
/// becomes `Timestamp`, a strict `YYYY-MM-DD` string becomes `Day`, and
/// any other string falls through to `Text` for lazy parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Timestamp object (`{seconds: ...}`) written by the SDK
    Timestamp { seconds: i64 },
    /// A value that already deserialized as a calendar day
    Day(NaiveDate),
    /// ISO or locale date string
    Text(String),
}

impl RawDate {
    /// Resolve to a concrete calendar day, if possible.
    ///
    /// Timestamps resolve against UTC so the result does not depend on
    /// the machine's timezone. Portal clients render timestamps in
    /// their local zone, so a timestamp close to midnight UTC can land
    /// on the neighboring day here.
    pub fn resolve(&self) -> Option<NaiveDate> {
        match self {
            RawDate::Timestamp { seconds } => {
                DateTime::from_timestamp(*seconds, 0).map(|dt| dt.date_naive())
            }
            RawDate::Day(day) => Some(*day),
            RawDate::Text(text) => parse_date_text(text),
        }
    }
}

/// Parse a date string: ISO `YYYY-MM-DD` first, then RFC 3339, then the
/// `MM/DD/YYYY` form older portal clients wrote.
fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(text, "%m/%d/%Y").ok()
}

/// A plain event document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEvent {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<RawDate>,
    /// `"HH:MM"` wall-clock time
    pub time: Option<String>,
    pub location: Option<String>,
    /// `"public"` / `"private"` in the store
    #[serde(rename = "type")]
    pub visibility: Option<String>,
    pub created_by: String,
    pub group_id: Option<String>,
}

/// A form document carrying a due date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawForm {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<RawDate>,
    pub due_time: Option<String>,
    #[serde(rename = "type")]
    pub visibility: Option<String>,
    pub created_by: String,
    pub group_id: Option<String>,
}

/// An announcement document with a scheduled publication date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnnouncement {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub scheduled_date: Option<RawDate>,
    pub scheduled_time: Option<String>,
    #[serde(rename = "type")]
    pub visibility: Option<String>,
    pub created_by: String,
    pub group_id: Option<String>,
}

/// A raw record tagged with which collection it was fetched from.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Event(RawEvent),
    Form(RawForm),
    Announcement(RawAnnouncement),
}
