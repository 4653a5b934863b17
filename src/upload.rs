//! Upload module: the INIT → APPEND → FINALIZE → STATUS sequence for one file.

use crate::config::UploadConfig;
use crate::error::{MediaError, Result};
use crate::http::{ProcessingInfo, ProcessingState};
use crate::media::{MediaCategory, MediaKind, MediaUsage};
use crate::traits::MediaEndpoint;
use crate::utils::{format_file_size, percent_of};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// State of a single file's upload.
///
/// Size and media type are fixed when the session is opened; `media_id` is
/// set once by INIT and `processing_info` is replaced by every FINALIZE or
/// STATUS response.
#[derive(Debug, Clone)]
pub struct UploadSession {
    file_path: PathBuf,
    total_bytes: u64,
    kind: MediaKind,
    media_category: Option<MediaCategory>,
    media_id: Option<u64>,
    processing_info: Option<ProcessingInfo>,
}

impl UploadSession {
    /// Opens a session for a local file.
    ///
    /// Fails with [`MediaError::UnsupportedMediaType`] before touching the
    /// file system if the extension is not in the lookup table.
    pub async fn open(path: impl AsRef<Path>, usage: MediaUsage) -> Result<Self> {
        let path = path.as_ref();
        let kind = MediaKind::from_path(path)?;

        let metadata = fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => MediaError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => MediaError::file_error(path.display().to_string(), e.to_string()),
        })?;

        if !metadata.is_file() {
            return Err(MediaError::file_error(
                path.display().to_string(),
                "not a regular file",
            ));
        }

        Ok(Self {
            file_path: path.to_path_buf(),
            total_bytes: metadata.len(),
            kind,
            media_category: kind.category_for(usage),
            media_id: None,
            processing_info: None,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn media_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    pub fn media_category(&self) -> Option<MediaCategory> {
        self.media_category
    }

    pub fn media_id(&self) -> Option<u64> {
        self.media_id
    }

    pub fn processing_info(&self) -> Option<&ProcessingInfo> {
        self.processing_info.as_ref()
    }

    fn require_media_id(&self) -> Result<u64> {
        self.media_id.ok_or_else(|| {
            MediaError::state_error(format!(
                "INIT has not completed for {}",
                self.file_path.display()
            ))
        })
    }
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub media_id: u64,
    pub media_type: &'static str,
    pub media_category: Option<MediaCategory>,
    pub total_bytes: u64,
    /// Last processing status, `None` for media that needed no processing
    pub processing_info: Option<ProcessingInfo>,
}

/// Drives one [`UploadSession`] through the chunked upload protocol.
#[derive(Debug)]
pub struct MediaUploader<E> {
    endpoint: Arc<E>,
    config: UploadConfig,
    session: UploadSession,
}

impl<E: MediaEndpoint> MediaUploader<E> {
    /// Creates a new uploader for an opened session.
    pub fn new(endpoint: Arc<E>, config: UploadConfig, session: UploadSession) -> Self {
        Self {
            endpoint,
            config,
            session,
        }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn into_session(self) -> UploadSession {
        self.session
    }

    /// Runs INIT, APPEND and FINALIZE (with status polling) in order.
    ///
    /// A rejected chunk stops the upload before FINALIZE is sent.
    pub async fn upload(mut self) -> Result<MediaUpload> {
        let media_id = self.init().await?;
        self.append().await?;
        self.finalize().await?;

        info!(
            "Upload of {} complete, media_id: {}",
            self.session.file_path.display(),
            media_id
        );

        Ok(MediaUpload {
            media_id,
            media_type: self.session.media_type(),
            media_category: self.session.media_category,
            total_bytes: self.session.total_bytes,
            processing_info: self.session.processing_info,
        })
    }

    /// Sends INIT and stores the returned media id.
    pub async fn init(&mut self) -> Result<u64> {
        if let Some(media_id) = self.session.media_id {
            return Err(MediaError::state_error(format!(
                "INIT already completed with media_id {media_id}"
            )));
        }

        info!(
            "INIT {} ({}, {})",
            self.session.file_path.display(),
            self.session.media_type(),
            format_file_size(self.session.total_bytes)
        );

        let response = self
            .endpoint
            .init(
                self.session.media_type(),
                self.session.total_bytes,
                self.session.media_category,
            )
            .await?;

        self.session.media_id = Some(response.media_id);
        info!("Media ID: {}", response.media_id);
        Ok(response.media_id)
    }

    /// Sends the file as sequential APPEND segments.
    ///
    /// Returns the number of segments sent. The file handle lives only for
    /// the duration of this call and is closed on every return path.
    pub async fn append(&mut self) -> Result<u32> {
        let media_id = self.session.require_media_id()?;
        let path = &self.session.file_path;
        let total_bytes = self.session.total_bytes;
        let chunk_size = self.config.chunk_size as u64;

        let mut file = File::open(path)
            .await
            .map_err(|e| MediaError::file_error(path.display().to_string(), e.to_string()))?;

        let mut segment_index: u32 = 0;
        let mut bytes_sent: u64 = 0;

        while bytes_sent < total_bytes {
            let limit = chunk_size.min(total_bytes - bytes_sent);
            let mut chunk = Vec::with_capacity(limit as usize);
            (&mut file).take(limit).read_to_end(&mut chunk).await?;

            if chunk.is_empty() {
                return Err(MediaError::file_error(
                    path.display().to_string(),
                    format!("file ended after {bytes_sent} of {total_bytes} bytes"),
                ));
            }

            debug!(
                "APPEND segment {} ({} bytes) for media {}",
                segment_index,
                chunk.len(),
                media_id
            );

            let status = self.endpoint.append(media_id, segment_index, chunk).await?;
            if !status.is_success() {
                warn!(
                    "APPEND segment {} for media {} rejected with HTTP {}",
                    segment_index, media_id, status
                );
                return Err(MediaError::AppendRejected {
                    media_id,
                    segment_index,
                    status: status.as_u16(),
                });
            }

            segment_index += 1;
            bytes_sent = file.stream_position().await?;

            info!(
                "{} of {} bytes uploaded ({}%)",
                bytes_sent,
                total_bytes,
                percent_of(bytes_sent, total_bytes)
            );
        }

        info!("Upload chunks complete: {} segments", segment_index);
        Ok(segment_index)
    }

    /// Sends FINALIZE, then polls processing status until it settles.
    pub async fn finalize(&mut self) -> Result<()> {
        let media_id = self.session.require_media_id()?;
        info!("FINALIZE media {}", media_id);

        let response = self.endpoint.finalize(media_id).await?;
        self.session.processing_info = response.processing_info;

        self.check_status().await
    }

    /// Polls STATUS until processing succeeds or fails.
    ///
    /// Returns immediately when there is no processing info (synchronous
    /// media). Gives up with [`MediaError::ProcessingTimeout`] after
    /// `max_status_checks` STATUS requests.
    pub async fn check_status(&mut self) -> Result<()> {
        let media_id = self.session.require_media_id()?;
        let mut checks: u32 = 0;

        loop {
            let Some(processing) = &self.session.processing_info else {
                return Ok(());
            };

            info!(
                "Media processing status is {:?} ({}%)",
                processing.state,
                processing.progress_percent.unwrap_or(0)
            );

            match processing.state {
                ProcessingState::Succeeded => return Ok(()),
                ProcessingState::Failed => {
                    let reason = processing
                        .error
                        .as_ref()
                        .map(|e| e.describe())
                        .unwrap_or_else(|| "processing failed".to_string());
                    return Err(MediaError::ProcessingFailed { media_id, reason });
                }
                ProcessingState::Pending
                | ProcessingState::InProgress
                | ProcessingState::Unknown => {}
            }

            if checks >= self.config.max_status_checks {
                return Err(MediaError::ProcessingTimeout {
                    media_id,
                    attempts: checks,
                });
            }

            let delay = self.config.poll_delay(processing.check_after_secs);
            info!("Checking after {:?}", delay);
            sleep(delay).await;

            checks += 1;
            debug!("STATUS media {} (check {})", media_id, checks);
            let response = self.endpoint.status(media_id).await?;
            self.session.processing_info = response.processing_info;
        }
    }
}
