//! Event aggregation: fetch, normalize, deduplicate, sort.
//!
//! The three sources are fetched concurrently and joined independently,
//! so one slow or failing source never blocks or fails the others. A
//! failed source contributes an empty list and a `SourceFailure` entry;
//! the caller decides how to surface partial results.

use std::collections::HashSet;

use async_trait::async_trait;
use schoolcal_core::normalize::{normalize_announcement, normalize_event, normalize_form};
use schoolcal_core::{CalendarEvent, FetchError, RawAnnouncement, RawEvent, RawForm};
use tracing::warn;

const SOURCE_COUNT: usize = 3;

/// The data-access collaborator: three scoped fetches against the
/// document store. Each fetch returns only the records the user may see;
/// scoping and authorization happen behind this trait.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Events created by the user plus events belonging to their groups.
    async fn fetch_user_and_group_events(
        &self,
        user_id: &str,
        group_ids: &[String],
    ) -> Result<Vec<RawEvent>, FetchError>;

    /// Forms with a due date visible to the user.
    async fn fetch_forms_with_due_dates(
        &self,
        user_id: &str,
        group_ids: &[String],
    ) -> Result<Vec<RawForm>, FetchError>;

    /// Announcements with a scheduled date visible to the user.
    async fn fetch_scheduled_announcements(
        &self,
        user_id: &str,
        group_ids: &[String],
    ) -> Result<Vec<RawAnnouncement>, FetchError>;
}

/// Which of the three fetches a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Events,
    Forms,
    Announcements,
}

/// A single source fetch that failed during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: Source,
    pub error: FetchError,
}

/// The outcome of one aggregation pass.
///
/// Aggregation never throws: failed sources are reported in `failures`,
/// and records with unusable dates are dropped and counted in `dropped`.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    /// Combined, deduplicated list, sorted by `(date, time)` ascending.
    pub events: Vec<CalendarEvent>,
    pub failures: Vec<SourceFailure>,
    /// Records discarded because their date could not be resolved.
    pub dropped: usize,
}

impl AggregateResult {
    /// At least one source failed, but others contributed.
    pub fn is_partial_failure(&self) -> bool {
        !self.failures.is_empty() && self.failures.len() < SOURCE_COUNT
    }

    /// Every source failed; `events` is empty.
    pub fn is_total_failure(&self) -> bool {
        self.failures.len() == SOURCE_COUNT
    }
}

/// Run one aggregation pass for the given user.
pub async fn aggregate<S: EventSource>(
    source: &S,
    user_id: &str,
    group_ids: &[String],
) -> AggregateResult {
    let (events, forms, announcements) = tokio::join!(
        source.fetch_user_and_group_events(user_id, group_ids),
        source.fetch_forms_with_due_dates(user_id, group_ids),
        source.fetch_scheduled_announcements(user_id, group_ids),
    );

    let mut result = AggregateResult::default();
    let mut combined: Vec<CalendarEvent> = Vec::new();

    match events {
        Ok(records) => {
            for raw in &records {
                push_normalized(normalize_event(raw), &mut combined, &mut result.dropped);
            }
        }
        Err(error) => record_failure(&mut result, Source::Events, error),
    }

    match forms {
        Ok(records) => {
            for raw in &records {
                push_normalized(normalize_form(raw), &mut combined, &mut result.dropped);
            }
        }
        Err(error) => record_failure(&mut result, Source::Forms, error),
    }

    match announcements {
        Ok(records) => {
            for raw in &records {
                push_normalized(
                    normalize_announcement(raw),
                    &mut combined,
                    &mut result.dropped,
                );
            }
        }
        Err(error) => record_failure(&mut result, Source::Announcements, error),
    }

    if result.dropped > 0 {
        warn!(
            "Dropped {} record(s) with unresolvable dates during aggregation",
            result.dropped
        );
    }

    // A record visible through more than one fetch path must appear
    // exactly once. First occurrence wins, keyed by the final composite
    // id (form-<id> etc.), so fetch order is preserved.
    let mut seen: HashSet<String> = HashSet::with_capacity(combined.len());
    combined.retain(|event| seen.insert(event.id.clone()));

    // Stable sort: entries with equal (date, time) keep fetch order.
    combined.sort_by_key(CalendarEvent::sort_key);

    result.events = combined;
    result
}

fn push_normalized(
    event: Option<CalendarEvent>,
    combined: &mut Vec<CalendarEvent>,
    dropped: &mut usize,
) {
    match event {
        Some(event) => combined.push(event),
        None => *dropped += 1,
    }
}

fn record_failure(result: &mut AggregateResult, source: Source, error: FetchError) {
    warn!("{:?} fetch failed during aggregation: {}", source, error);
    result.failures.push(SourceFailure { source, error });
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolcal_core::RawDate;

    /// Stub source with canned per-fetch results.
    struct StubSource {
        events: Result<Vec<RawEvent>, FetchError>,
        forms: Result<Vec<RawForm>, FetchError>,
        announcements: Result<Vec<RawAnnouncement>, FetchError>,
    }

    impl StubSource {
        fn empty() -> Self {
            StubSource {
                events: Ok(vec![]),
                forms: Ok(vec![]),
                announcements: Ok(vec![]),
            }
        }
    }

    #[async_trait]
    impl EventSource for StubSource {
        async fn fetch_user_and_group_events(
            &self,
            _user_id: &str,
            _group_ids: &[String],
        ) -> Result<Vec<RawEvent>, FetchError> {
            self.events.clone()
        }

        async fn fetch_forms_with_due_dates(
            &self,
            _user_id: &str,
            _group_ids: &[String],
        ) -> Result<Vec<RawForm>, FetchError> {
            self.forms.clone()
        }

        async fn fetch_scheduled_announcements(
            &self,
            _user_id: &str,
            _group_ids: &[String],
        ) -> Result<Vec<RawAnnouncement>, FetchError> {
            self.announcements.clone()
        }
    }

    fn raw_event(id: &str, date: &str, time: Option<&str>) -> RawEvent {
        RawEvent {
            id: id.to_string(),
            title: Some(format!("Event {}", id)),
            date: Some(RawDate::Text(date.to_string())),
            time: time.map(str::to_string),
            created_by: "alice".to_string(),
            ..Default::default()
        }
    }

    fn raw_form(id: &str, due: &str) -> RawForm {
        RawForm {
            id: id.to_string(),
            title: Some(format!("Form {}", id)),
            due_date: Some(RawDate::Text(due.to_string())),
            created_by: "alice".to_string(),
            ..Default::default()
        }
    }

    async fn run(source: &StubSource) -> AggregateResult {
        aggregate(source, "alice", &["g1".to_string()]).await
    }

    #[tokio::test]
    async fn test_combined_list_is_sorted_by_date_then_time() {
        let source = StubSource {
            events: Ok(vec![
                raw_event("late", "2024-06-20", Some("18:00")),
                raw_event("early", "2024-06-01", None),
                raw_event("mid", "2024-06-20", Some("08:00")),
            ]),
            ..StubSource::empty()
        };
        let result = run(&source).await;
        let ids: Vec<&str> = result.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "mid", "late"]);
        assert!(result.failures.is_empty());
    }

    #[tokio::test]
    async fn test_form_visible_through_two_paths_appears_once() {
        // The collaborator merges "created by user" and "member of group"
        // queries; the same form can come back twice.
        let source = StubSource {
            forms: Ok(vec![raw_form("f1", "2024-06-10"), raw_form("f1", "2024-06-10")]),
            ..StubSource::empty()
        };
        let result = run(&source).await;
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].id, "form-f1");
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_sources() {
        let source = StubSource {
            events: Ok(vec![raw_event("e1", "2024-06-10", None)]),
            forms: Err(FetchError::Backend("permission denied".to_string())),
            announcements: Ok(vec![RawAnnouncement {
                id: "a1".to_string(),
                title: Some("Assembly".to_string()),
                scheduled_date: Some(RawDate::Text("2024-06-11".to_string())),
                created_by: "principal".to_string(),
                ..Default::default()
            }]),
        };
        let result = run(&source).await;
        assert_eq!(result.events.len(), 2);
        assert!(result.is_partial_failure());
        assert!(!result.is_total_failure());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].source, Source::Forms);
    }

    #[tokio::test]
    async fn test_total_failure_returns_empty_with_details() {
        let source = StubSource {
            events: Err(FetchError::Timeout),
            forms: Err(FetchError::Timeout),
            announcements: Err(FetchError::Timeout),
        };
        let result = run(&source).await;
        assert!(result.events.is_empty());
        assert!(result.is_total_failure());
        assert_eq!(result.failures.len(), 3);
    }

    #[tokio::test]
    async fn test_unresolvable_dates_are_dropped_and_counted() {
        let source = StubSource {
            events: Ok(vec![
                raw_event("good", "2024-06-10", None),
                raw_event("bad", "whenever", None),
            ]),
            ..StubSource::empty()
        };
        let result = run(&source).await;
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].id, "good");
        assert_eq!(result.dropped, 1);
    }

    #[tokio::test]
    async fn test_aggregation_is_repeatable() {
        let source = StubSource {
            events: Ok(vec![
                raw_event("b", "2024-06-10", Some("10:00")),
                raw_event("a", "2024-06-10", Some("10:00")),
            ]),
            forms: Ok(vec![raw_form("f1", "2024-06-09")]),
            ..StubSource::empty()
        };
        let first = run(&source).await;
        let second = run(&source).await;
        let first_ids: Vec<&str> = first.events.iter().map(|e| e.id.as_str()).collect();
        let second_ids: Vec<&str> = second.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
        // Equal (date, time) keeps fetch order.
        assert_eq!(first_ids, vec!["form-f1", "b", "a"]);
    }

    #[tokio::test]
    async fn test_mixed_date_shapes_produce_distinct_events_on_same_day() {
        let source = StubSource {
            events: Ok(vec![
                raw_event("s1", "2024-03-01", None),
                RawEvent {
                    date: Some(RawDate::Timestamp {
                        seconds: 1_709_251_200,
                    }),
                    ..raw_event("s2", "ignored", None)
                },
                RawEvent {
                    date: Some(RawDate::Day(
                        chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    )),
                    ..raw_event("s3", "ignored", None)
                },
            ]),
            ..StubSource::empty()
        };
        let result = run(&source).await;
        assert_eq!(result.events.len(), 3);
        for event in &result.events {
            assert_eq!(event.date_string(), "2024-03-01");
        }
    }
}
