//! reqwest implementation of [`EventsBackend`].

use std::sync::Arc;

use eventlog_core::config::ClientConfig;
use eventlog_core::event::{Event, EventDetail, EventId};
use eventlog_core::protocol::{
    Endpoint, ErrorResponse, FetchEvent, GenerateSignedUrlsRequest, LoginRequest, Method,
    PatchEventRequest, PostEventRequest, PostUserRequest, SignedUrlsResponse,
};
use reqwest::header::{CONTENT_TYPE, COOKIE};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::backend::EventsBackend;
use crate::error::{ClientError, ClientResult};
use crate::session::CurrentUser;

/// HTTP client for the eventlog backend.
///
/// No timeout and no retry: a hung request waits for whatever the network
/// stack decides.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    user: Arc<dyn CurrentUser>,
}

impl HttpBackend {
    /// `base_url` may carry a path prefix (`https://host/eventlog`); endpoints
    /// are resolved below it.
    pub fn new(base_url: &str, user: Arc<dyn CurrentUser>) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(HttpBackend {
            http: reqwest::Client::new(),
            base_url,
            user,
        })
    }

    pub fn from_config(config: &ClientConfig, user: Arc<dyn CurrentUser>) -> ClientResult<Self> {
        Self::new(&config.api_base_url, user)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a typed request to the backend and decode its response.
    async fn send<E: Endpoint>(&self, endpoint: &E) -> ClientResult<E::Response> {
        let path = endpoint.path();
        let url = self.endpoint_url(&path)?;

        let mut request = match E::METHOD {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url).json(endpoint),
            Method::Patch => self.http.patch(url).json(endpoint),
        };

        // The backend authenticates through the `token` cookie
        if let Some(token) = self.user.id_token() {
            request = request.header(COOKIE, format!("token={token}"));
        }

        debug!(method = ?E::METHOD, %path, "sending request");
        let resp = request.send().await?;
        read_response(resp).await
    }
}

impl EventsBackend for HttpBackend {
    async fn fetch_event(&self, id: &EventId) -> ClientResult<EventDetail> {
        self.send(&FetchEvent { id: id.clone() }).await
    }

    async fn create_event(&self, body: &PostEventRequest) -> ClientResult<Event> {
        self.send(body).await
    }

    async fn patch_event(&self, body: &PatchEventRequest) -> ClientResult<()> {
        self.send(body).await?;
        Ok(())
    }

    async fn generate_signed_urls(
        &self,
        body: &GenerateSignedUrlsRequest,
    ) -> ClientResult<SignedUrlsResponse> {
        self.send(body).await
    }

    async fn upload_to_signed_url(&self, signed_url: &str, bytes: Vec<u8>) -> ClientResult<()> {
        let url = Url::parse(signed_url)?;
        debug!(
            host = url.host_str().unwrap_or_default(),
            size = bytes.len(),
            "uploading to signed url"
        );

        // Straight to storage: the signature in the URL is the credential
        let resp = self
            .http
            .put(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn register_user(&self, body: &PostUserRequest) -> ClientResult<()> {
        self.send(body).await?;
        Ok(())
    }

    async fn login(&self) -> ClientResult<()> {
        self.send(&LoginRequest).await?;
        Ok(())
    }
}

async fn read_response<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .map(|err| err.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    // Endpoints whose reply is ignored may answer with an empty body
    let body: &[u8] = if body.is_empty() { b"null" } else { &body };
    serde_json::from_slice(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
