//! Trait abstractions over the two remote endpoints.
//!
//! [`MediaUploader`](crate::upload::MediaUploader) and
//! [`StatusPoster`](crate::status::StatusPoster) talk to the service only
//! through these traits, so the protocol sequencing can be exercised against
//! an in-memory endpoint.

use crate::error::Result;
use crate::http::{InitResponse, ProcessingResponse, StatusUpdateResponse};
use crate::media::MediaCategory;
use async_trait::async_trait;
use reqwest::StatusCode;

/// The four commands of the chunked media-upload protocol.
#[async_trait]
pub trait MediaEndpoint: Send + Sync {
    /// `INIT`: announces type, size and optional category; returns the media id.
    async fn init(
        &self,
        media_type: &str,
        total_bytes: u64,
        media_category: Option<MediaCategory>,
    ) -> Result<InitResponse>;

    /// `APPEND`: sends one segment. Only the HTTP status is reported back.
    async fn append(&self, media_id: u64, segment_index: u32, chunk: Vec<u8>)
    -> Result<StatusCode>;

    /// `FINALIZE`: closes the upload and may start asynchronous processing.
    async fn finalize(&self, media_id: u64) -> Result<ProcessingResponse>;

    /// `STATUS`: queries asynchronous processing.
    async fn status(&self, media_id: u64) -> Result<ProcessingResponse>;
}

/// Status-update endpoint.
#[async_trait]
pub trait StatusEndpoint: Send + Sync {
    /// Posts `text` with the given media attached.
    async fn update_status(&self, text: &str, media_ids: &[u64]) -> Result<StatusUpdateResponse>;
}
