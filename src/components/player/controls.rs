use crate::api::CatalogClient;
use crate::components::{DownloadsController, Icon, PlaybackSignal};
use crate::player::PlayerStore;
use dioxus::prelude::*;

#[component]
pub(super) fn PlayPauseButton() -> Element {
    let store = use_context::<PlayerStore>();
    let playback = use_context::<PlaybackSignal>().0;
    let playing = playback().is_playing;

    rsx! {
        button {
            id: "play-pause-btn",
            r#type: "button",
            aria_label: if playing { "Pause" } else { "Play" },
            class: "w-12 h-12 rounded-full bg-violet-500 text-white flex items-center justify-center hover:scale-105 transition-transform shadow-lg shadow-violet-500/30",
            onclick: move |_| store.toggle_play(),
            if playing {
                Icon { name: "pause".to_string(), class: "w-5 h-5".to_string() }
            } else {
                Icon {
                    name: "play".to_string(),
                    class: "w-5 h-5 ml-0.5".to_string(),
                }
            }
        }
    }
}

/// Mute toggles between silence and the default level.
#[component]
pub(super) fn MuteButton() -> Element {
    let store = use_context::<PlayerStore>();
    let playback = use_context::<PlaybackSignal>().0;
    let muted = playback().volume <= 0.0;

    rsx! {
        button {
            id: "mute-btn",
            r#type: "button",
            aria_label: if muted { "Unmute" } else { "Mute" },
            class: "p-2 text-zinc-400 hover:text-white transition-colors",
            onclick: move |_| store.toggle_mute(),
            Icon {
                name: if muted { "volume-x".to_string() } else { "volume".to_string() },
                class: "w-4 h-4".to_string(),
            }
        }
    }
}

#[component]
pub(super) fn DownloadButton() -> Element {
    let client = use_context::<CatalogClient>();
    let downloads = use_context::<DownloadsController>();
    let playback = use_context::<PlaybackSignal>().0;

    let current = playback().current;
    let downloading = current
        .as_ref()
        .is_some_and(|item| downloads.is_downloading(&item.id));
    let downloadable = current
        .as_ref()
        .is_some_and(|item| item.download_source().is_some());

    rsx! {
        button {
            id: "download-btn",
            r#type: "button",
            aria_label: "Download",
            disabled: !downloadable || downloads.is_busy(),
            class: "p-2 text-sky-400 hover:text-sky-300 disabled:opacity-40 transition-colors",
            onclick: move |_| {
                if let Some(item) = playback.peek().current.clone() {
                    downloads.start(client.clone(), item);
                }
            },
            if downloading {
                Icon { name: "loader".to_string(), class: "w-4 h-4".to_string() }
            } else {
                Icon { name: "download".to_string(), class: "w-4 h-4".to_string() }
            }
        }
    }
}
