//! The list of files the user has downloaded, persisted as JSON under a
//! single key.

use crate::db::{KeyValueStore, StorageError};
use crate::media::{MediaItem, MediaKind, Playable};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

pub const DOWNLOADS_KEY: &str = "behimelobot_downloads";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEntry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    pub downloaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    pub original_media: MediaItem,
}

impl DownloadEntry {
    pub fn new(item: &MediaItem, size_bytes: Option<u64>, downloaded_at: DateTime<Utc>) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            artist: item.artist.clone(),
            kind: item.kind,
            downloaded_at,
            file_size: size_bytes.map(format_size),
            local_path: Some(crate::media::download_file_name(item)),
            original_media: item.clone(),
        }
    }
}

impl Playable for DownloadEntry {
    fn media_kind(&self) -> MediaKind {
        self.kind
    }

    fn playback_source(&self) -> Option<&str> {
        self.original_media.playback_source()
    }

    fn display_label(&self) -> String {
        self.original_media.display_label()
    }
}

pub fn format_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.1} KB");
    }
    let mb = kb / 1024.0;
    if mb < 1024.0 {
        format!("{mb:.1} MB")
    } else {
        format!("{:.2} GB", mb / 1024.0)
    }
}

pub fn format_downloaded_at(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}

/// Download entries, newest first, backed by a [`KeyValueStore`].
pub struct DownloadList<S: KeyValueStore> {
    store: S,
    entries: Vec<DownloadEntry>,
}

impl<S: KeyValueStore> DownloadList<S> {
    /// Reads the persisted list. Missing or unreadable data yields an empty
    /// list.
    pub fn load(store: S) -> Self {
        let entries = match store.get_string(DOWNLOADS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<DownloadEntry>>(&raw).unwrap_or_else(|err| {
                tracing::warn!("discarding malformed download list: {err}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("download list unavailable: {err}");
                Vec::new()
            }
        };
        Self { store, entries }
    }

    pub fn entries(&self) -> &[DownloadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn record(&mut self, item: &MediaItem, size_bytes: Option<u64>) -> Result<(), StorageError> {
        self.record_at(item, size_bytes, Utc::now())
    }

    /// Replaces any previous entry for the same id and puts the new one first.
    /// The in-memory list only changes once the write succeeds.
    pub fn record_at(
        &mut self,
        item: &MediaItem,
        size_bytes: Option<u64>,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(DownloadEntry::new(item, size_bytes, at));
        next.extend(
            self.entries
                .iter()
                .filter(|entry| entry.id != item.id)
                .cloned(),
        );
        self.replace(next)
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }
        let next = self
            .entries
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();
        self.replace(next)?;
        Ok(true)
    }

    pub fn persist(&self) -> Result<(), StorageError> {
        self.write(&self.entries)
    }

    fn replace(&mut self, next: Vec<DownloadEntry>) -> Result<(), StorageError> {
        self.write(&next)?;
        self.entries = next;
        Ok(())
    }

    fn write(&self, entries: &[DownloadEntry]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entries)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.store.set_string(DOWNLOADS_KEY, &raw)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use chrono::TimeZone;
    use std::rc::Rc;

    fn song(id: &str, title: &str) -> MediaItem {
        MediaItem::new(id, title, MediaKind::Song)
            .with_artist("Googoosh")
            .with_link(format!("https://cdn/{id}.mp3"))
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "0.5 KB");
        assert_eq!(format_size(3_565_158), "3.4 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn record_upserts_newest_first() {
        let store = Rc::new(SqliteStore::in_memory().unwrap());
        let mut list = DownloadList::load(store.clone());
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();

        list.record_at(&song("1", "Pol"), Some(1024 * 1024), t0).unwrap();
        list.record_at(&song("2", "Hejrat"), None, t0).unwrap();
        list.record_at(&song("1", "Pol"), Some(2 * 1024 * 1024), t1).unwrap();

        let ids: Vec<&str> = list.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(list.entries()[0].downloaded_at, t1);
        assert_eq!(list.entries()[0].file_size.as_deref(), Some("2.0 MB"));

        let reloaded = DownloadList::load(store);
        assert_eq!(reloaded.entries(), list.entries());
    }

    #[test]
    fn remove_persists_and_reports_misses() {
        let store = Rc::new(SqliteStore::in_memory().unwrap());
        let mut list = DownloadList::load(store.clone());
        list.record(&song("1", "Pol"), None).unwrap();
        assert!(list.remove("1").unwrap());
        assert!(!list.remove("1").unwrap());
        assert!(DownloadList::load(store).is_empty());
    }

    // Reads pass through; writes fail while `read_only` is set.
    struct FlakyStore {
        inner: SqliteStore,
        read_only: std::cell::Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_string(key)
        }

        fn set_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.read_only.get() {
                return Err(StorageError::Backend("quota exceeded".into()));
            }
            self.inner.set_string(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_writes_leave_the_list_unchanged() {
        let store = Rc::new(FlakyStore {
            inner: SqliteStore::in_memory().unwrap(),
            read_only: std::cell::Cell::new(false),
        });
        let mut list = DownloadList::load(store.clone());
        list.record(&song("1", "Pol"), None).unwrap();

        store.read_only.set(true);
        assert!(list.record(&song("2", "Hejrat"), None).is_err());
        assert!(list.remove("1").is_err());

        let ids: Vec<&str> = list.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
        assert_eq!(DownloadList::load(store).entries(), list.entries());
    }

    #[test]
    fn malformed_json_loads_as_empty() {
        let store = SqliteStore::in_memory().unwrap();
        store.set_string(DOWNLOADS_KEY, "{not json").unwrap();
        let list = DownloadList::load(store);
        assert!(list.is_empty());
        assert_eq!(count_label(list.len()), "0 item(s) downloaded");
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap();
        let entry = DownloadEntry::new(&song("7", "Gole Yakh"), Some(2048), at);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "song");
        assert_eq!(value["downloadedAt"], "2024-01-05T08:30:00Z");
        assert_eq!(value["fileSize"], "2.0 KB");
        assert_eq!(value["localPath"], "Googoosh - Gole Yakh.mp3");
        assert_eq!(value["originalMedia"]["id"], "7");
    }

    #[test]
    fn entries_play_their_original_media() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap();
        let entry = DownloadEntry::new(&song("7", "Gole Yakh"), None, at);
        assert_eq!(entry.playback_source(), Some("https://cdn/7.mp3"));
        assert_eq!(entry.display_label(), "Googoosh - Gole Yakh");
    }
}
