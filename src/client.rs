//! High-level client tying configuration, credentials and both endpoints together.

use crate::auth::Credentials;
use crate::config::Config;
use crate::error::Result;
use crate::http::TwitterHttpClient;
use crate::media::MediaUsage;
use crate::status::StatusPoster;
use crate::upload::{MediaUpload, MediaUploader, UploadSession};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Outcome of [`TwitterClient::upload_and_post`].
#[derive(Debug, Clone)]
pub struct PostedMedia {
    pub media: MediaUpload,
    pub status_id: u64,
}

/// Entry point of the SDK.
///
/// ```rust,no_run
/// use tweet_media_rs::{Credentials, Result, TwitterClient};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let client = TwitterClient::new(Credentials::from_env()?)?;
///     let posted = client.upload_and_post("./clip.mp4", "New clip").await?;
///     println!("Posted {} with media {}", posted.status_id, posted.media.media_id);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: Arc<TwitterHttpClient>,
    poster: StatusPoster<TwitterHttpClient>,
}

impl TwitterClient {
    /// Creates a client with the default configuration.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, Config::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(credentials: Credentials, config: Config) -> Result<Self> {
        let http = Arc::new(TwitterHttpClient::with_config(credentials, config)?);
        let poster = StatusPoster::new(Arc::clone(&http));
        Ok(Self { http, poster })
    }

    /// Creates a client from `TWITTER_*` credentials and `TWEET_MEDIA_*` settings.
    pub fn from_env() -> Result<Self> {
        Self::with_config(Credentials::from_env()?, Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        self.http.config()
    }

    /// Opens a session and returns an uploader for step-by-step control.
    pub async fn uploader(
        &self,
        path: impl AsRef<Path>,
        usage: MediaUsage,
    ) -> Result<MediaUploader<TwitterHttpClient>> {
        let session = UploadSession::open(path, usage).await?;
        Ok(MediaUploader::new(
            Arc::clone(&self.http),
            self.config().upload.clone(),
            session,
        ))
    }

    /// Uploads a file and waits for server-side processing to finish.
    pub async fn upload_media(
        &self,
        path: impl AsRef<Path>,
        usage: MediaUsage,
    ) -> Result<MediaUpload> {
        self.uploader(path, usage).await?.upload().await
    }

    /// Posts a status referencing already uploaded media.
    pub async fn post_status(&self, media_ids: &[u64], text: &str) -> Result<u64> {
        self.poster.post_status(media_ids, text).await
    }

    /// Uploads a file for use in a post, then posts `text` with it attached.
    pub async fn upload_and_post(
        &self,
        path: impl AsRef<Path>,
        text: &str,
    ) -> Result<PostedMedia> {
        let path = path.as_ref();
        let media = self.upload_media(path, MediaUsage::Tweet).await?;
        let status_id = self.poster.post_tweet(media.media_id, text).await?;

        info!(
            "Posted {} as status {} (media {})",
            path.display(),
            status_id,
            media.media_id
        );

        Ok(PostedMedia { media, status_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadConfig;
    use crate::config::HttpConfig;
    use crate::error::MediaError;
    use crate::test_server::serve_sequence;
    use std::io::Write;

    fn credentials() -> Credentials {
        Credentials::new("ck", "cs", "at", "as")
    }

    #[test]
    fn test_client_creation() {
        let client = TwitterClient::new(credentials()).unwrap();
        assert_eq!(client.config().upload.chunk_size, 1024 * 1024);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config::builder()
            .upload(UploadConfig::builder().chunk_size(0).build())
            .build();

        assert!(matches!(
            TwitterClient::with_config(credentials(), config),
            Err(MediaError::Config { .. })
        ));
    }

    #[tokio::test]
    async fn test_unsupported_file_fails_before_any_request() {
        let client = TwitterClient::new(credentials()).unwrap();
        let file = tempfile::Builder::new().suffix(".bmp").tempfile().unwrap();

        assert!(matches!(
            client.upload_media(file.path(), MediaUsage::Tweet).await,
            Err(MediaError::UnsupportedMediaType { .. })
        ));
    }

    #[tokio::test]
    async fn test_uploader_opens_session() {
        let config = Config::builder()
            .upload(UploadConfig::builder().chunk_size(2048).build())
            .build();
        let client = TwitterClient::with_config(credentials(), config).unwrap();
        let file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();

        let uploader = client
            .uploader(file.path(), MediaUsage::DirectMessage)
            .await
            .unwrap();
        assert_eq!(uploader.session().total_bytes(), 0);
        assert_eq!(uploader.session().media_category(), None);
    }

    #[tokio::test]
    async fn test_upload_and_post() {
        let (base_url, server) = serve_sequence(vec![
            (
                "HTTP/1.1 200 OK",
                r#"{"media_id":42,"media_id_string":"42","expires_after_secs":86400}"#,
            ),
            ("HTTP/1.1 204 No Content", ""),
            ("HTTP/1.1 200 OK", r#"{"media_id":42,"size":16}"#),
            ("HTTP/1.1 200 OK", r#"{"id":7,"id_str":"7","text":"New photo"}"#),
        ])
        .await;

        let config = Config::builder()
            .http(
                HttpConfig::builder()
                    .upload_url(format!("{base_url}/1.1/media/upload.json"))
                    .status_url(format!("{base_url}/1.1/statuses/update.json"))
                    .build(),
            )
            .build();
        let client = TwitterClient::with_config(credentials(), config).unwrap();

        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xAB; 16]).unwrap();
        file.flush().unwrap();

        let posted = client.upload_and_post(file.path(), "New photo").await.unwrap();
        assert_eq!(posted.status_id, 7);
        assert_eq!(posted.media.media_id, 42);
        assert_eq!(posted.media.total_bytes, 16);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 4);
        assert!(requests[0].contains("command=INIT"));
        assert!(requests[1].contains("name=\"segment_index\""));
        assert!(requests[2].contains("command=FINALIZE"));
        assert!(requests[3].starts_with("POST /1.1/statuses/update.json"));
        assert!(requests[3].contains("status=New+photo"));
        assert!(requests[3].contains("media_ids=42"));
    }
}
