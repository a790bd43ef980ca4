//! The seam between the controllers and the eventlog REST API.

use eventlog_core::event::{Event, EventDetail, EventId};
use eventlog_core::protocol::{
    GenerateSignedUrlsRequest, PatchEventRequest, PostEventRequest, PostUserRequest,
    SignedUrlsResponse,
};

use crate::error::ClientResult;

/// Calls the controllers make against the backend.
///
/// [`crate::HttpBackend`] is the real implementation; tests substitute
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait EventsBackend {
    /// `GET /api/events/{id}`
    async fn fetch_event(&self, id: &EventId) -> ClientResult<EventDetail>;

    /// `POST /api/events`
    async fn create_event(&self, body: &PostEventRequest) -> ClientResult<Event>;

    /// `PATCH /api/events/{id}`
    async fn patch_event(&self, body: &PatchEventRequest) -> ClientResult<()>;

    /// Ask for signed upload slots.
    async fn generate_signed_urls(
        &self,
        body: &GenerateSignedUrlsRequest,
    ) -> ClientResult<SignedUrlsResponse>;

    /// `PUT` raw bytes straight to storage.
    async fn upload_to_signed_url(&self, signed_url: &str, bytes: Vec<u8>) -> ClientResult<()>;

    /// `POST /api/users`
    async fn register_user(&self, body: &PostUserRequest) -> ClientResult<()>;

    /// `GET /api/auth/login`
    async fn login(&self) -> ClientResult<()>;
}
