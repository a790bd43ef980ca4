//! In-memory fakes shared by the saga, controller and account tests.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use eventlog_core::event::{Event, EventDetail, EventId, RecordId};
use eventlog_core::protocol::{
    GenerateSignedUrlsRequest, PatchEventRequest, PostEventRequest, PostUserRequest,
    SignedUpload, SignedUrlsResponse,
};
use eventlog_core::success::Success;
use tokio::sync::Notify;

use crate::backend::EventsBackend;
use crate::error::{ClientError, ClientResult};
use crate::notify::{Notification, Notifier};

pub const SIGNED_URL: &str = "https://storage.example/uploads/k1?sig=1";
pub const FILE_KEY: &str = "uploads/k1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    FetchEvent,
    CreateEvent,
    PatchEvent,
    GenerateSignedUrls,
    Upload,
    RegisterUser,
    Login,
}

#[derive(Default)]
pub struct FakeBackend {
    pub calls: Mutex<Vec<Call>>,
    pub created: Mutex<Vec<PostEventRequest>>,
    pub patched: Mutex<Vec<PatchEventRequest>>,
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
    pub registered: Mutex<Vec<PostUserRequest>>,
    pub fail_on: Option<Call>,
    /// Answer slot requests with an empty list
    pub no_slots: bool,
    /// Hold `patch_event` until notified
    pub patch_gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn failing_on(call: Call) -> Self {
        FakeBackend {
            fail_on: Some(call),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: Call) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(call) {
            return Err(ClientError::Api {
                status: 500,
                message: format!("{call:?} failed"),
            });
        }
        Ok(())
    }
}

pub fn sample_event(id: &str) -> Event {
    Event {
        id: RecordId::new(id),
        title: "Trip".to_string(),
        start_date_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        end_date_time: None,
        place: Some("Kyoto".to_string()),
        url: None,
        member: None,
        memo: None,
        diary: None,
        success: Success::Unknown,
    }
}

impl EventsBackend for FakeBackend {
    async fn fetch_event(&self, id: &EventId) -> ClientResult<EventDetail> {
        self.enter(Call::FetchEvent)?;
        Ok(EventDetail {
            event: sample_event(id.as_str()),
            event_photos: Vec::new(),
        })
    }

    async fn create_event(&self, body: &PostEventRequest) -> ClientResult<Event> {
        self.enter(Call::CreateEvent)?;
        self.created.lock().unwrap().push(body.clone());

        let mut event = sample_event("1");
        event.title = body.title.clone();
        event.start_date_time = body.start_date_time;
        event.end_date_time = body.end_date_time;
        event.place = body.place.clone();
        Ok(event)
    }

    async fn patch_event(&self, body: &PatchEventRequest) -> ClientResult<()> {
        self.enter(Call::PatchEvent)?;
        if let Some(gate) = &self.patch_gate {
            gate.notified().await;
        }
        self.patched.lock().unwrap().push(body.clone());
        Ok(())
    }

    async fn generate_signed_urls(
        &self,
        body: &GenerateSignedUrlsRequest,
    ) -> ClientResult<SignedUrlsResponse> {
        self.enter(Call::GenerateSignedUrls)?;
        assert_eq!(body.upload_length, 1);

        if self.no_slots {
            return Ok(SignedUrlsResponse { uploads: Vec::new() });
        }
        Ok(SignedUrlsResponse {
            uploads: vec![SignedUpload {
                file_key: FILE_KEY.to_string(),
                signed_gcs_url: SIGNED_URL.to_string(),
            }],
        })
    }

    async fn upload_to_signed_url(&self, signed_url: &str, bytes: Vec<u8>) -> ClientResult<()> {
        self.enter(Call::Upload)?;
        self.uploads
            .lock()
            .unwrap()
            .push((signed_url.to_string(), bytes));
        Ok(())
    }

    async fn register_user(&self, body: &PostUserRequest) -> ClientResult<()> {
        self.enter(Call::RegisterUser)?;
        self.registered.lock().unwrap().push(body.clone());
        Ok(())
    }

    async fn login(&self) -> ClientResult<()> {
        self.enter(Call::Login)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
