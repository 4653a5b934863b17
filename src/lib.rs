//! # Chunked media upload SDK
//!
//! Uploads images, GIFs and videos through the chunked media-upload protocol
//! (INIT / APPEND / FINALIZE), waits for server-side processing, and posts a
//! status with the resulting media attached.
//!
//! ## Features
//!
//! - **Simple API**: one call to upload and post: `client.upload_and_post("./clip.mp4", "text")`
//! - **Bounded**: processing-status polling stops after a configurable number of checks
//! - **Explicit configuration**: credentials and settings are passed in, never global
//! - **Testable**: the uploader talks to the service through [`MediaEndpoint`] / [`StatusEndpoint`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tweet_media_rs::{Credentials, MediaUsage, Result, TwitterClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credentials = Credentials::new("consumer_key", "consumer_secret", "access_token", "access_secret");
//!     let client = TwitterClient::new(credentials)?;
//!     let media = client.upload_media("./clip.mp4", MediaUsage::Tweet).await?;
//!     let status_id = client.post_status(&[media.media_id], "Uploaded from Rust").await?;
//!     println!("Posted status {status_id}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod media;
pub mod status;
pub mod traits;
pub mod upload;
pub mod utils;

#[cfg(test)]
mod test_server;

// Re-export main types for convenience
pub use auth::Credentials;
pub use client::{PostedMedia, TwitterClient};
pub use config::Config;
pub use error::{MediaError, Result};
pub use media::{MediaCategory, MediaKind, MediaUsage};
pub use status::StatusPoster;
pub use traits::{MediaEndpoint, StatusEndpoint};
pub use upload::{MediaUpload, MediaUploader, UploadSession};
