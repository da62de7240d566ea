//! Shared type aliases used across the workspace.

/// All domain entities are identified by a UUID (v4) assigned at creation.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (shoot days, schedule start) carry no time zone.
pub type CalendarDate = chrono::NaiveDate;
