use crate::components::{DownloadsController, Icon, PlaybackSignal};
use crate::downloads::{count_label, format_downloaded_at, DownloadEntry};
use crate::media::MediaKind;
use crate::player::PlayerStore;
use dioxus::prelude::*;

#[component]
pub fn DownloadsView() -> Element {
    let downloads = use_context::<DownloadsController>();
    let entries = downloads.entries();

    rsx! {
        div { class: "space-y-6",
            header {
                h1 { class: "text-3xl font-bold text-white", "Downloads" }
                p { class: "text-zinc-400 mt-1", "Files saved from this browser" }
            }

            if entries.is_empty() {
                div { class: "flex flex-col items-center justify-center py-24 text-center",
                    Icon { name: "download".to_string(), class: "w-12 h-12 text-zinc-600 mb-4".to_string() }
                    h2 { class: "text-xl font-semibold text-white", "No downloads yet" }
                    p { class: "text-zinc-500 mt-2", "Use the download button on any track to keep a copy" }
                }
            } else {
                div { class: "space-y-2",
                    for entry in entries.iter().cloned() {
                        DownloadRow { key: "{entry.id}", entry }
                    }
                }
                p { class: "text-sm text-zinc-500 text-center pt-4", "{count_label(entries.len())}" }
            }
        }
    }
}

#[component]
fn DownloadRow(entry: DownloadEntry) -> Element {
    let store = use_context::<PlayerStore>();
    let playback = use_context::<PlaybackSignal>().0;
    let downloads = use_context::<DownloadsController>();

    let state = playback();
    let is_playing = state.is_current(&entry.id) && state.is_playing;
    let media = entry.original_media.clone();
    let id = entry.id.clone();
    let icon = if entry.kind == MediaKind::Video { "video" } else { "music" };

    rsx! {
        div { class: "group flex items-center gap-4 p-4 rounded-xl bg-zinc-900/60 border border-zinc-800/60",
            "data-testid": "download-{entry.id}",
            div { class: "w-12 h-12 rounded-lg bg-zinc-800 flex items-center justify-center flex-shrink-0",
                Icon { name: icon.to_string(), class: "w-6 h-6 text-zinc-500".to_string() }
            }
            div { class: "flex-1 min-w-0",
                p { class: "font-medium text-white truncate", "{entry.title}" }
                if let Some(artist) = &entry.artist {
                    p { class: "text-sm text-zinc-400 truncate", "{artist}" }
                }
                div { class: "flex flex-wrap items-center gap-2 mt-1 text-xs text-zinc-500",
                    span { class: "px-2 py-0.5 rounded-full bg-zinc-800 text-zinc-300", "{entry.kind.label()}" }
                    span { "{format_downloaded_at(&entry.downloaded_at)}" }
                    if let Some(size) = &entry.file_size {
                        span { "{size}" }
                    }
                }
            }
            button {
                class: "w-10 h-10 rounded-full bg-violet-500 hover:bg-violet-400 text-white flex items-center justify-center",
                aria_label: if is_playing { "Pause" } else { "Play" },
                onclick: move |_| store.play_or_toggle(media.clone()),
                if is_playing {
                    Icon { name: "pause".to_string(), class: "w-4 h-4".to_string() }
                } else {
                    Icon { name: "play".to_string(), class: "w-4 h-4 ml-0.5".to_string() }
                }
            }
            button {
                class: "w-10 h-10 rounded-full text-zinc-500 hover:text-rose-400 hover:bg-rose-500/10 flex items-center justify-center transition-colors",
                aria_label: "Remove download",
                onclick: move |_| downloads.remove(&id),
                Icon { name: "trash".to_string(), class: "w-4 h-4".to_string() }
            }
        }
    }
}
