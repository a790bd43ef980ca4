//! Request and response bodies of the eventlog REST API.
//!
//! Every request type implements [`Endpoint`], which ties it to its HTTP
//! method, path and response type so a transport can send any of them through
//! one generic call.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize, Serializer};

use crate::event::{Event, EventDetail, EventId};
use crate::form::EventValues;
use crate::success::Success;

pub trait Endpoint: Serialize {
    type Response: DeserializeOwned;
    const METHOD: Method;
    fn path(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso_string(dt))
}

fn serialize_iso_opt<S: Serializer>(
    dt: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match dt {
        Some(dt) => serializer.serialize_str(&to_iso_string(dt)),
        None => serializer.serialize_none(),
    }
}

// ============================================================================
// Events
// ============================================================================

/// `GET /api/events/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct FetchEvent {
    #[serde(skip)]
    pub id: EventId,
}

impl Endpoint for FetchEvent {
    type Response = EventDetail;
    const METHOD: Method = Method::Get;

    fn path(&self) -> String {
        format!("/api/events/{}", self.id)
    }
}

/// `POST /api/events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEventRequest {
    pub title: String,
    #[serde(serialize_with = "serialize_iso")]
    pub start_date_time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_iso_opt")]
    pub end_date_time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub url: Option<String>,
    pub member: Option<String>,
    pub memo: Option<String>,
}

impl From<&EventValues> for PostEventRequest {
    fn from(values: &EventValues) -> Self {
        PostEventRequest {
            title: values.title.clone(),
            start_date_time: values.start_date_time,
            end_date_time: values.end_date_time,
            place: values.place.clone(),
            url: values.url.clone(),
            member: values.member.clone(),
            memo: values.memo.clone(),
        }
    }
}

impl Endpoint for PostEventRequest {
    type Response = Event;
    const METHOD: Method = Method::Post;

    fn path(&self) -> String {
        "/api/events".to_string()
    }
}

/// The `event` part of a patch body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchEventFields {
    pub title: String,
    #[serde(serialize_with = "serialize_iso")]
    pub start_date_time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_iso_opt")]
    pub end_date_time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub url: Option<String>,
    pub member: Option<String>,
    pub memo: Option<String>,
    pub diary: Option<String>,
    pub success: Success,
}

impl From<&EventValues> for PatchEventFields {
    fn from(values: &EventValues) -> Self {
        PatchEventFields {
            title: values.title.clone(),
            start_date_time: values.start_date_time,
            end_date_time: values.end_date_time,
            place: values.place.clone(),
            url: values.url.clone(),
            member: values.member.clone(),
            memo: values.memo.clone(),
            diary: values.diary.clone(),
            success: values.success,
        }
    }
}

/// Links an uploaded object to the event being patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDescriptor {
    pub file_key: String,
    pub original_file_name: String,
}

/// `PATCH /api/events/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchEventRequest {
    #[serde(skip)]
    pub id: EventId,
    pub event: PatchEventFields,
    /// Zero or one element
    pub event_photos: Vec<PhotoDescriptor>,
}

impl PatchEventRequest {
    pub fn new(id: EventId, values: &EventValues, event_photos: Vec<PhotoDescriptor>) -> Self {
        PatchEventRequest {
            id,
            event: PatchEventFields::from(values),
            event_photos,
        }
    }
}

impl Endpoint for PatchEventRequest {
    type Response = IgnoredAny;
    const METHOD: Method = Method::Patch;

    fn path(&self) -> String {
        format!("/api/events/{}", self.id)
    }
}

// ============================================================================
// Uploads
// ============================================================================

/// `POST /api/generate-signed-urls`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSignedUrlsRequest {
    pub upload_length: u32,
}

impl GenerateSignedUrlsRequest {
    /// One slot, which is all the edit flow ever asks for.
    pub fn single() -> Self {
        GenerateSignedUrlsRequest { upload_length: 1 }
    }
}

impl Endpoint for GenerateSignedUrlsRequest {
    type Response = SignedUrlsResponse;
    const METHOD: Method = Method::Post;

    fn path(&self) -> String {
        "/api/generate-signed-urls".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlsResponse {
    pub uploads: Vec<SignedUpload>,
}

/// A time-limited, pre-authorized storage target for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUpload {
    pub file_key: String,
    pub signed_gcs_url: String,
}

// ============================================================================
// Accounts
// ============================================================================

/// `POST /api/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUserRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl Endpoint for PostUserRequest {
    type Response = IgnoredAny;
    const METHOD: Method = Method::Post;

    fn path(&self) -> String {
        "/api/users".to_string()
    }
}

/// `GET /api/auth/login`, confirms the signed-in user with the backend.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LoginRequest;

impl Endpoint for LoginRequest {
    type Response = IgnoredAny;
    const METHOD: Method = Method::Get;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RecordId;
    use crate::form::EventForm;
    use chrono::TimeZone;
    use serde_json::json;

    fn trip_values() -> EventValues {
        let mut form = EventForm::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        form.title = "Trip".to_string();
        form.validate().unwrap()
    }

    #[test]
    fn test_post_body_nulls_empty_fields() {
        let body = serde_json::to_value(PostEventRequest::from(&trip_values())).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Trip",
                "startDateTime": "2024-01-01T00:00:00.000Z",
                "endDateTime": null,
                "place": null,
                "url": null,
                "member": null,
                "memo": null
            })
        );
    }

    #[test]
    fn test_patch_body_shape() {
        let mut values = trip_values();
        values.end_date_time = Some(Utc.with_ymd_and_hms(2024, 1, 2, 12, 30, 0).unwrap());
        values.diary = Some("Great".to_string());

        let request = PatchEventRequest::new(
            RecordId::new("12"),
            &values,
            vec![PhotoDescriptor {
                file_key: "uploads/abc".to_string(),
                original_file_name: "summit.jpg".to_string(),
            }],
        );
        assert_eq!(request.path(), "/api/events/12");

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "event": {
                    "title": "Trip",
                    "startDateTime": "2024-01-01T00:00:00.000Z",
                    "endDateTime": "2024-01-02T12:30:00.000Z",
                    "place": null,
                    "url": null,
                    "member": null,
                    "memo": null,
                    "diary": "Great",
                    "success": null
                },
                "eventPhotos": [
                    { "fileKey": "uploads/abc", "originalFileName": "summit.jpg" }
                ]
            })
        );
    }

    #[test]
    fn test_signed_url_bodies() {
        assert_eq!(
            serde_json::to_value(GenerateSignedUrlsRequest::single()).unwrap(),
            json!({ "uploadLength": 1 })
        );

        let response: SignedUrlsResponse = serde_json::from_value(json!({
            "uploads": [{ "fileKey": "k1", "signedGcsUrl": "https://storage.example/k1?sig=x" }]
        }))
        .unwrap();
        assert_eq!(response.uploads[0].file_key, "k1");
        assert_eq!(response.uploads[0].signed_gcs_url, "https://storage.example/k1?sig=x");
    }

    #[test]
    fn test_user_body_uses_camel_case() {
        let body = serde_json::to_value(PostUserRequest {
            email: "a@example.com".into(),
            password: "abcd1234".into(),
            password_confirmation: "abcd1234".into(),
        })
        .unwrap();
        assert_eq!(body["passwordConfirmation"], "abcd1234");
    }

    #[test]
    fn test_iso_string_keeps_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 8, 5, 3).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(to_iso_string(&dt), "2024-06-01T08:05:03.250Z");
    }
}
