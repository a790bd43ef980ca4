//! Save sequence of the edit dialog: optional photo upload, then the patch.
//!
//! The steps run strictly in order and the first failure aborts the rest.
//! An object already uploaded when the patch fails is left in storage.

use std::fmt;

use eventlog_core::event::EventId;
use eventlog_core::form::ValidatedEdit;
use eventlog_core::photo::PhotoCandidate;
use eventlog_core::protocol::{GenerateSignedUrlsRequest, PatchEventRequest, PhotoDescriptor};
use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::EventsBackend;
use crate::error::ClientError;

/// Network steps that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    RequestingSlot,
    Uploading,
    Patching,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveStep::RequestingSlot => "requesting upload slot",
            SaveStep::Uploading => "uploading photo",
            SaveStep::Patching => "patching event",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveState {
    #[default]
    Idle,
    RequestingSlot,
    Uploading,
    Patching,
    Succeeded,
    Failed(SaveStep),
}

#[derive(Error, Debug)]
#[error("{step} failed: {source}")]
pub struct SaveError {
    pub step: SaveStep,
    #[source]
    pub source: ClientError,
}

pub struct UploadSaga<'a, B> {
    backend: &'a B,
    state: SaveState,
    history: Vec<SaveState>,
}

impl<'a, B: EventsBackend> UploadSaga<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        UploadSaga {
            backend,
            state: SaveState::Idle,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Every state entered so far, in order.
    pub fn history(&self) -> &[SaveState] {
        &self.history
    }

    pub async fn run(&mut self, id: &EventId, edit: ValidatedEdit) -> Result<(), SaveError> {
        let ValidatedEdit { values, photos } = edit;

        let mut photos = photos.into_iter();
        let mut descriptors = Vec::new();
        if let Some(photo) = photos.next() {
            descriptors.push(self.upload(photo).await?);
        }
        if photos.len() > 0 {
            debug!(ignored = photos.len(), "only the first photo is uploaded");
        }

        self.enter(SaveState::Patching);
        let request = PatchEventRequest::new(id.clone(), &values, descriptors);
        let backend = self.backend;
        if let Err(e) = backend.patch_event(&request).await {
            return Err(self.fail(SaveStep::Patching, e));
        }

        self.enter(SaveState::Succeeded);
        Ok(())
    }

    async fn upload(&mut self, photo: PhotoCandidate) -> Result<PhotoDescriptor, SaveError> {
        let backend = self.backend;

        self.enter(SaveState::RequestingSlot);
        let slot = match backend
            .generate_signed_urls(&GenerateSignedUrlsRequest::single())
            .await
        {
            Ok(response) => response.uploads.into_iter().next(),
            Err(e) => return Err(self.fail(SaveStep::RequestingSlot, e)),
        };
        let Some(slot) = slot else {
            let e = ClientError::InvalidResponse("no upload slot returned".to_string());
            return Err(self.fail(SaveStep::RequestingSlot, e));
        };

        self.enter(SaveState::Uploading);
        let PhotoCandidate {
            file_name, bytes, ..
        } = photo;
        if let Err(e) = backend.upload_to_signed_url(&slot.signed_gcs_url, bytes).await {
            return Err(self.fail(SaveStep::Uploading, e));
        }

        Ok(PhotoDescriptor {
            file_key: slot.file_key,
            original_file_name: file_name,
        })
    }

    fn enter(&mut self, state: SaveState) {
        debug!(from = ?self.state, to = ?state, "save step");
        self.state = state;
        self.history.push(state);
    }

    fn fail(&mut self, step: SaveStep, source: ClientError) -> SaveError {
        warn!(%step, error = %source, "event save aborted");
        self.enter(SaveState::Failed(step));
        SaveError { step, source }
    }
}
