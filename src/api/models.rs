use crate::media::{MediaItem, MediaKind, SourceSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaylistOwner {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub thumb: String,
}

/// Every entity the catalog returns (songs, albums, artists, playlists,
/// videos, podcasts) shares this loose shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hq_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hls_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_artwork: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<PlaylistOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plays: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_colors: Option<Vec<String>>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl CatalogItem {
    /// Artist, then creator, then caption.
    pub fn display_name(&self) -> Option<&str> {
        non_empty(&self.artist)
            .or_else(|| non_empty(&self.created_by))
            .or_else(|| non_empty(&self.caption))
    }

    /// Photo, then thumbnail.
    pub fn artwork(&self) -> Option<&str> {
        non_empty(&self.photo).or_else(|| non_empty(&self.thumbnail))
    }

    pub fn follower_total(&self) -> Option<u64> {
        self.followers.or(self.follower_count)
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_catalog_type(&self.item_type)
    }

    pub fn sources(&self) -> SourceSet {
        SourceSet {
            link: self.link.clone(),
            hq_link: self.hq_link.clone(),
            hls_link: self.hls_link.clone(),
        }
    }

    /// The player-facing projection of this entry. Card clicks fall back to
    /// the creator when there is no artist.
    pub fn to_media_item(&self) -> MediaItem {
        MediaItem {
            id: self.id.clone(),
            title: self.title.clone(),
            artist: non_empty(&self.artist)
                .or_else(|| non_empty(&self.created_by))
                .map(str::to_string),
            album: non_empty(&self.album).map(str::to_string),
            photo: self.artwork().map(str::to_string),
            sources: self.sources(),
            kind: self.kind(),
            duration: non_empty(&self.duration).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    SliderSquare,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Section {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub section_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_link: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CatalogItem>>,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self.section_type.as_str() {
            "header" => SectionKind::Header,
            "slider_square" => SectionKind::SliderSquare,
            other => SectionKind::Other(other.to_string()),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Headers and non-empty square sliders are rendered; everything else
    /// is skipped.
    pub fn is_renderable(&self) -> bool {
        match self.kind() {
            SectionKind::Header => true,
            SectionKind::SliderSquare => !self.items().is_empty(),
            SectionKind::Other(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HomeResult {
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HomeResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub result: HomeResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResult {
    #[serde(default)]
    pub songs: Vec<CatalogItem>,
    #[serde(default)]
    pub albums: Vec<CatalogItem>,
    #[serde(default)]
    pub artists: Vec<CatalogItem>,
    #[serde(default)]
    pub playlists: Vec<CatalogItem>,
    #[serde(default)]
    pub videos: Vec<CatalogItem>,
    #[serde(default)]
    pub podcasts: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchTab {
    All,
    Songs,
    Albums,
    Artists,
    Playlists,
    Videos,
    Podcasts,
}

impl SearchTab {
    pub const CATEGORIES: [SearchTab; 6] = [
        SearchTab::Songs,
        SearchTab::Albums,
        SearchTab::Artists,
        SearchTab::Playlists,
        SearchTab::Videos,
        SearchTab::Podcasts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchTab::All => "All",
            SearchTab::Songs => "Songs",
            SearchTab::Albums => "Albums",
            SearchTab::Artists => "Artists",
            SearchTab::Playlists => "Playlists",
            SearchTab::Videos => "Videos",
            SearchTab::Podcasts => "Podcasts",
        }
    }
}

impl SearchResult {
    pub fn category(&self, tab: SearchTab) -> &[CatalogItem] {
        match tab {
            SearchTab::All => &[],
            SearchTab::Songs => &self.songs,
            SearchTab::Albums => &self.albums,
            SearchTab::Artists => &self.artists,
            SearchTab::Playlists => &self.playlists,
            SearchTab::Videos => &self.videos,
            SearchTab::Podcasts => &self.podcasts,
        }
    }

    pub fn total(&self) -> usize {
        SearchTab::CATEGORIES
            .iter()
            .map(|tab| self.category(*tab).len())
            .sum()
    }

    /// `All` first, then one tab per non-empty category.
    pub fn tabs(&self) -> Vec<SearchTab> {
        std::iter::once(SearchTab::All)
            .chain(
                SearchTab::CATEGORIES
                    .into_iter()
                    .filter(|tab| !self.category(*tab).is_empty()),
            )
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub result: SearchResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaylistDetailResult {
    pub playlist: CatalogItem,
    #[serde(default)]
    pub tracks: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaylistDetail {
    #[serde(default)]
    pub status: u16,
    pub result: PlaylistDetailResult,
}

/// Error body returned by every proxy route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub token_configured: bool,
}

/// Detail routes the proxy exposes, one per catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    Playlist,
    Song,
    Album,
    Artist,
    Video,
    Podcast,
}

impl DetailKind {
    pub const ALL: [DetailKind; 6] = [
        DetailKind::Playlist,
        DetailKind::Song,
        DetailKind::Album,
        DetailKind::Artist,
        DetailKind::Video,
        DetailKind::Podcast,
    ];

    pub fn path_segment(self) -> &'static str {
        match self {
            DetailKind::Playlist => "playlist",
            DetailKind::Song => "song",
            DetailKind::Album => "album",
            DetailKind::Artist => "artist",
            DetailKind::Video => "video",
            DetailKind::Podcast => "podcast",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_through_creator_and_caption() {
        let mut item = CatalogItem {
            id: "1".into(),
            caption: Some("Weekly picks".into()),
            ..CatalogItem::default()
        };
        assert_eq!(item.display_name(), Some("Weekly picks"));
        item.created_by = Some("Radio Javan".into());
        assert_eq!(item.display_name(), Some("Radio Javan"));
        item.artist = Some("Shadmehr".into());
        assert_eq!(item.display_name(), Some("Shadmehr"));
    }

    #[test]
    fn media_item_projection_keeps_locators_and_kind() {
        let raw = r#"{
            "id": 42,
            "title": "Clip",
            "type": "video",
            "created_by": "RJ",
            "thumbnail": "https://x/t.jpg",
            "hq_link": "https://x/v.mp4",
            "duration": "3:12"
        }"#;
        let item: CatalogItem = serde_json::from_str(raw).unwrap();
        let media = item.to_media_item();
        assert_eq!(media.id, "42");
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(media.artist.as_deref(), Some("RJ"));
        assert_eq!(media.photo.as_deref(), Some("https://x/t.jpg"));
        assert_eq!(media.sources.hq_link.as_deref(), Some("https://x/v.mp4"));
        assert_eq!(media.duration.as_deref(), Some("3:12"));
    }

    #[test]
    fn home_sections_classify_for_rendering() {
        let raw = r#"{"status":200,"result":{"sections":[
            {"id":"1","type":"header","title":"Trending"},
            {"id":"2","type":"slider_square","title":"Hot","items":[{"id":"9","title":"A","type":"playlist"}]},
            {"id":"3","type":"slider_square","items":[]},
            {"id":"4","type":"banner"}
        ]}}"#;
        let home: HomeResponse = serde_json::from_str(raw).unwrap();
        let renderable: Vec<&str> = home
            .result
            .sections
            .iter()
            .filter(|s| s.is_renderable())
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(renderable, vec!["1", "2"]);
        assert_eq!(home.result.sections[3].kind(), SectionKind::Other("banner".into()));
    }

    #[test]
    fn search_tabs_follow_non_empty_categories() {
        let raw = r#"{"status":200,"result":{
            "songs":[{"id":"1","title":"Test Song","artist":"Test Artist"}],
            "videos":[{"id":"2","title":"V","type":"video"},{"id":"3","title":"W","type":"video"}]
        }}"#;
        let search: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(search.result.total(), 3);
        assert_eq!(
            search.result.tabs(),
            vec![SearchTab::All, SearchTab::Songs, SearchTab::Videos]
        );
    }

    #[test]
    fn error_body_omits_missing_message() {
        let body = ApiErrorBody {
            status: 400,
            error: "Search query is required".into(),
            message: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": 400, "error": "Search query is required"})
        );
    }
}
