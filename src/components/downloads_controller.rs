use dioxus::prelude::*;

use crate::api::{CatalogClient, DownloadedFile};
use crate::db::{default_store, PlatformStore};
use crate::downloads::{DownloadEntry, DownloadList};
use crate::media::MediaItem;

fn with_download_list<R>(f: impl FnOnce(&mut DownloadList<PlatformStore>) -> R) -> Option<R> {
    match default_store() {
        Ok(store) => Some(f(&mut DownloadList::load(store))),
        Err(err) => {
            tracing::warn!("download list unavailable: {err}");
            None
        }
    }
}

pub fn load_download_entries() -> Vec<DownloadEntry> {
    with_download_list(|list| list.entries().to_vec()).unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn save_file(file: &DownloadedFile) -> Result<(), String> {
    crate::downloads::save_to_device(file)
}

#[cfg(not(target_arch = "wasm32"))]
fn save_file(file: &DownloadedFile) -> Result<(), String> {
    tracing::debug!(name = %file.file_name, "no browser to hand the file to");
    Ok(())
}

/// Downloads in flight and the persisted list, shared by the player bar,
/// track rows and the downloads page.
#[derive(Clone, Copy)]
pub struct DownloadsController {
    entries: Signal<Vec<DownloadEntry>>,
    active: Signal<Option<String>>,
    error: Signal<Option<String>>,
}

impl DownloadsController {
    pub fn new(
        entries: Signal<Vec<DownloadEntry>>,
        active: Signal<Option<String>>,
        error: Signal<Option<String>>,
    ) -> Self {
        Self {
            entries,
            active,
            error,
        }
    }

    pub fn entries(&self) -> Vec<DownloadEntry> {
        (self.entries)()
    }

    pub fn is_downloading(&self, id: &str) -> bool {
        (self.active)().as_deref() == Some(id)
    }

    pub fn is_busy(&self) -> bool {
        (self.active)().is_some()
    }

    pub fn error(&self) -> Option<String> {
        (self.error)()
    }

    pub fn dismiss_error(&self) {
        let mut error = self.error;
        error.set(None);
    }

    /// Fetches `item` through the proxy, hands it to the browser and records
    /// it. One download runs at a time.
    pub fn start(&self, client: CatalogClient, item: MediaItem) {
        let mut active = self.active;
        let mut error = self.error;
        let mut entries = self.entries;
        if active.peek().is_some() {
            return;
        }
        active.set(Some(item.id.clone()));
        error.set(None);

        spawn(async move {
            match client.download(&item).await {
                Ok(file) => match save_file(&file) {
                    Ok(()) => {
                        let size = file.bytes.len() as u64;
                        let recorded = with_download_list(|list| {
                            if let Err(err) = list.record(&item, Some(size)) {
                                tracing::warn!("failed to record download: {err}");
                            }
                            list.entries().to_vec()
                        });
                        if let Some(list) = recorded {
                            entries.set(list);
                        }
                    }
                    Err(message) => {
                        tracing::warn!("could not save {}: {message}", file.file_name);
                        error.set(Some(format!("Could not save {}", file.file_name)));
                    }
                },
                Err(err) => {
                    tracing::error!("download failed: {err}");
                    error.set(Some(err.user_message()));
                }
            }
            active.set(None);
        });
    }

    pub fn remove(&self, id: &str) {
        let mut entries = self.entries;
        let updated = with_download_list(|list| {
            if let Err(err) = list.remove(id) {
                tracing::warn!("failed to remove download {id}: {err}");
            }
            list.entries().to_vec()
        });
        if let Some(list) = updated {
            entries.set(list);
        }
    }
}
