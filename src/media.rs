//! Media type lookup: file extension → MIME type → upload category.

use crate::error::{MediaError, Result};
use crate::utils::get_file_extension;
use std::fmt;
use std::path::Path;

/// Media formats accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Gif,
    Mp4,
    Jpeg,
    Webp,
    Png,
}

/// Upload category sent with INIT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    TweetGif,
    TweetVideo,
    TweetImage,
}

/// Where the uploaded media will be used.
///
/// Media for direct messages is uploaded without a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaUsage {
    #[default]
    Tweet,
    DirectMessage,
}

const EXTENSIONS: &[(&str, MediaKind)] = &[
    ("gif", MediaKind::Gif),
    ("mp4", MediaKind::Mp4),
    ("jpg", MediaKind::Jpeg),
    ("webp", MediaKind::Webp),
    ("png", MediaKind::Png),
];

impl MediaKind {
    /// Looks up a kind by file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, kind)| *kind)
    }

    /// Resolves the kind of a local file from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = get_file_extension(path).unwrap_or_default();
        Self::from_extension(extension).ok_or_else(|| MediaError::UnsupportedMediaType {
            path: path.display().to_string(),
            extension: extension.to_string(),
        })
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            MediaKind::Gif => "image/gif",
            MediaKind::Mp4 => "video/mp4",
            MediaKind::Jpeg => "image/jpeg",
            MediaKind::Webp => "image/webp",
            MediaKind::Png => "image/png",
        }
    }

    pub fn category(self) -> MediaCategory {
        match self {
            MediaKind::Gif => MediaCategory::TweetGif,
            MediaKind::Mp4 => MediaCategory::TweetVideo,
            MediaKind::Jpeg | MediaKind::Webp | MediaKind::Png => MediaCategory::TweetImage,
        }
    }

    /// Category to send for the given usage, if any.
    pub fn category_for(self, usage: MediaUsage) -> Option<MediaCategory> {
        match usage {
            MediaUsage::Tweet => Some(self.category()),
            MediaUsage::DirectMessage => None,
        }
    }
}

impl MediaCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaCategory::TweetGif => "tweet_gif",
            MediaCategory::TweetVideo => "tweet_video",
            MediaCategory::TweetImage => "tweet_image",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
