//! Core types for the schoolcal engine.
//!
//! This crate provides the shared types used by the aggregation engine
//! and its rendering hosts:
//! - `CalendarEvent` and related types for unified calendar entries
//! - raw source records as they come out of the document store
//! - the pure normalization step that turns raw records into events

pub mod error;
pub mod event;
pub mod normalize;
pub mod raw;

// Re-export the main types at crate root for convenience
pub use error::FetchError;
pub use event::*;
pub use raw::*;
