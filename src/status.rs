//! Posting a status message with attached media.

use crate::error::{MediaError, Result};
use crate::traits::StatusEndpoint;
use std::sync::Arc;
use tracing::info;

/// Maximum number of media items a single status may reference.
pub const MAX_MEDIA_PER_STATUS: usize = 4;

/// Posts status updates through a [`StatusEndpoint`].
#[derive(Debug)]
pub struct StatusPoster<E> {
    endpoint: Arc<E>,
}

impl<E> Clone for StatusPoster<E> {
    fn clone(&self) -> Self {
        Self {
            endpoint: Arc::clone(&self.endpoint),
        }
    }
}

impl<E: StatusEndpoint> StatusPoster<E> {
    pub fn new(endpoint: Arc<E>) -> Self {
        Self { endpoint }
    }

    /// Posts `text` with a single uploaded media item attached.
    pub async fn post_tweet(&self, media_id: u64, text: &str) -> Result<u64> {
        self.post_status(&[media_id], text).await
    }

    /// Posts `text` referencing `media_ids` and returns the new post's id.
    pub async fn post_status(&self, media_ids: &[u64], text: &str) -> Result<u64> {
        if text.trim().is_empty() && media_ids.is_empty() {
            return Err(MediaError::InvalidStatus {
                message: "status needs text or at least one media id".to_string(),
            });
        }

        if media_ids.len() > MAX_MEDIA_PER_STATUS {
            return Err(MediaError::InvalidStatus {
                message: format!(
                    "at most {MAX_MEDIA_PER_STATUS} media ids per status, got {}",
                    media_ids.len()
                ),
            });
        }

        let response = self.endpoint.update_status(text, media_ids).await?;
        info!("Posted status {} with media {:?}", response.id, media_ids);
        Ok(response.id)
    }
}
