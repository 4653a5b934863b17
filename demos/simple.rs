//! Uploads a media file and posts it with a status message.
//!
//! ```text
//! TWITTER_CONSUMER_KEY=... TWITTER_CONSUMER_SECRET=... \
//! TWITTER_ACCESS_TOKEN=... TWITTER_ACCESS_SECRET=... \
//! RUST_LOG=info cargo run --example simple -- ./clip.mp4 "Hello from Rust"
//! ```

use tracing_subscriber::EnvFilter;
use tweet_media_rs::{Result, TwitterClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: simple <media-file> [status text]");
        std::process::exit(2);
    };
    let text = args.next().unwrap_or_default();

    let client = TwitterClient::from_env()?;

    match client.upload_and_post(&path, &text).await {
        Ok(posted) => {
            println!(
                "✅ Posted status {} with media {} ({} bytes, {})",
                posted.status_id,
                posted.media.media_id,
                posted.media.total_bytes,
                posted.media.media_type
            );
        }
        Err(e) => {
            eprintln!("❌ Upload failed [{}]: {e}", e.severity());
            if e.is_retryable() {
                eprintln!("   the error is transient, running again may succeed");
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
