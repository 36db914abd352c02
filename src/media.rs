//! Playable media items and the source locators they carry.

use serde::{Deserialize, Serialize};

/// Which sink renders a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Song,
    Video,
    Podcast,
}

impl MediaKind {
    /// Catalog entries use free-form `type` strings; anything that is not a
    /// video or podcast plays as a song.
    pub fn from_catalog_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "video" => Self::Video,
            "podcast" => Self::Podcast,
            _ => Self::Song,
        }
    }

    pub fn sink(self) -> SinkKind {
        match self {
            Self::Video => SinkKind::Video,
            Self::Song | Self::Podcast => SinkKind::Audio,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Video => "video",
            Self::Podcast => "podcast",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Song | Self::Podcast => "mp3",
        }
    }
}

/// The three locators a catalog item may expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hq_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hls_link: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl SourceSet {
    /// High quality first, then the standard link, then the streaming link.
    pub fn playback_source(&self) -> Option<&str> {
        present(&self.hq_link)
            .or_else(|| present(&self.link))
            .or_else(|| present(&self.hls_link))
    }

    /// Downloads never fall back to the streaming playlist.
    pub fn download_source(&self) -> Option<&str> {
        present(&self.hq_link).or_else(|| present(&self.link))
    }

    pub fn is_empty(&self) -> bool {
        self.playback_source().is_none()
    }
}

/// The item currently selected for playback. Replaced wholesale on every
/// selection, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(flatten)]
    pub sources: SourceSet,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl MediaItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.sources.link = Some(link.into());
        self
    }

    pub fn with_hq_link(mut self, link: impl Into<String>) -> Self {
        self.sources.hq_link = Some(link.into());
        self
    }

    pub fn with_hls_link(mut self, link: impl Into<String>) -> Self {
        self.sources.hls_link = Some(link.into());
        self
    }

    pub fn download_source(&self) -> Option<&str> {
        self.sources.download_source()
    }
}

/// Anything the player can be pointed at.
pub trait Playable {
    fn media_kind(&self) -> MediaKind;
    fn playback_source(&self) -> Option<&str>;
    fn display_label(&self) -> String;
}

impl Playable for MediaItem {
    fn media_kind(&self) -> MediaKind {
        self.kind
    }

    fn playback_source(&self) -> Option<&str> {
        self.sources.playback_source()
    }

    fn display_label(&self) -> String {
        match self.artist.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(artist) => format!("{artist} - {}", self.title),
            None => self.title.clone(),
        }
    }
}

/// File name offered to the browser when saving a download.
pub fn download_file_name(item: &MediaItem) -> String {
    let artist = item
        .artist
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Unknown");
    format!(
        "{artist} - {}.{}",
        item.title,
        item.kind.file_extension()
    )
}
