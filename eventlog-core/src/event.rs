//! Event records as stored by the backend.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EventLogError, EventLogResult};
use crate::success::Success;

/// Opaque, server-assigned identifier.
///
/// The backend may hand these out as JSON numbers or strings; both are kept
/// as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

pub type EventId = RecordId;
pub type PhotoId = RecordId;

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => RecordId(n.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

/// An event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub url: Option<String>,
    /// Companions who came along
    pub member: Option<String>,
    pub memo: Option<String>,
    /// Free-form report written after the event
    pub diary: Option<String>,
    #[serde(default)]
    pub success: Success,
}

/// A photo attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPhoto {
    pub id: PhotoId,
    /// Storage reference assigned by the backend when the upload slot was issued
    pub file_key: String,
    /// Client-supplied, display only
    pub original_file_name: String,
}

/// An event together with its photos, as returned by `GET /api/events/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub event: Event,
    #[serde(default)]
    pub event_photos: Vec<EventPhoto>,
}

/// Parse a user-supplied timestamp.
///
/// Accepts RFC 3339 (`2024-01-01T09:30:00Z`, `2024-01-01T09:30:00+09:00`) or a
/// bare date, which is taken as the start of that day in UTC.
pub fn parse_timestamp(input: &str) -> EventLogResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| EventLogError::InvalidTimestamp(input.to_string()))
}
