use crate::api::{CatalogClient, CatalogItem};
use crate::components::{DownloadsController, Icon, PlaybackSignal};
use crate::player::PlayerStore;
use dioxus::prelude::*;

fn format_followers(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Artwork card. The overlay button selects the item for playback.
#[component]
pub fn MediaCard(item: CatalogItem) -> Element {
    let store = use_context::<PlayerStore>();
    let artwork = item.artwork().map(str::to_string);
    let subtitle = item.display_name().map(str::to_string);
    let followers = item.follower_total();
    let media = item.to_media_item();

    rsx! {
        div {
            class: "group relative overflow-hidden rounded-xl bg-zinc-900/60 border border-zinc-800/60 hover:border-zinc-700 transition-all",
            "data-testid": "card-media-{item.id}",
            div { class: "aspect-square relative overflow-hidden",
                match &artwork {
                    Some(url) => rsx! {
                        img {
                            src: "{url}",
                            alt: "{item.title}",
                            class: "w-full h-full object-cover transition-transform duration-300 group-hover:scale-105",
                            loading: "lazy",
                        }
                    },
                    None => rsx! {
                        div { class: "w-full h-full flex items-center justify-center bg-zinc-800",
                            Icon { name: "music".to_string(), class: "w-16 h-16 text-zinc-600".to_string() }
                        }
                    },
                }
                div { class: "absolute inset-0 bg-gradient-to-t from-black/60 via-transparent to-transparent opacity-0 group-hover:opacity-100 transition-opacity duration-300",
                    button {
                        class: "absolute bottom-4 right-4 w-12 h-12 rounded-full bg-violet-500 hover:bg-violet-400 flex items-center justify-center shadow-lg",
                        aria_label: "Play",
                        onclick: move |e: MouseEvent| {
                            e.stop_propagation();
                            store.select_media(media.clone());
                        },
                        Icon { name: "play".to_string(), class: "w-5 h-5 text-white ml-0.5".to_string() }
                    }
                }
            }
            div { class: "p-4",
                h3 { class: "font-semibold text-white truncate mb-1", "{item.title}" }
                if let Some(subtitle) = subtitle {
                    p { class: "text-sm text-zinc-400 truncate", "{subtitle}" }
                }
                if let Some(count) = followers {
                    div { class: "flex items-center gap-1 mt-2 text-xs text-zinc-500",
                        Icon { name: "users".to_string(), class: "w-3 h-3".to_string() }
                        span { "{format_followers(count)} followers" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn MediaGrid(items: Vec<CatalogItem>) -> Element {
    rsx! {
        div { class: "grid grid-cols-2 md:grid-cols-3 lg:grid-cols-4 xl:grid-cols-5 gap-6",
            for item in items {
                MediaCard { key: "{item.id}", item }
            }
        }
    }
}

/// Numbered rows. Clicking the current row toggles playback.
#[component]
pub fn TrackList(tracks: Vec<CatalogItem>) -> Element {
    rsx! {
        div { class: "space-y-1",
            for (index, track) in tracks.into_iter().enumerate() {
                TrackRow { key: "{track.id}", index, track }
            }
        }
    }
}

#[component]
fn TrackRow(index: usize, track: CatalogItem) -> Element {
    let store = use_context::<PlayerStore>();
    let playback = use_context::<PlaybackSignal>().0;
    let downloads = use_context::<DownloadsController>();
    let client = use_context::<CatalogClient>();

    let state = playback();
    let is_current = state.is_current(&track.id);
    let is_playing = is_current && state.is_playing;
    let media = track.to_media_item();
    let media_for_download = media.clone();
    let downloading = downloads.is_downloading(&track.id);
    let artwork = track.artwork().map(str::to_string);

    rsx! {
        div {
            class: if is_current { "group flex items-center gap-4 p-3 rounded-md bg-violet-500/10" } else { "group flex items-center gap-4 p-3 rounded-md hover:bg-zinc-800/40" },
            "data-testid": "track-{track.id}",
            button {
                class: "w-8 h-8 flex items-center justify-center text-sm text-zinc-400 hover:text-white",
                aria_label: if is_playing { "Pause" } else { "Play" },
                onclick: move |_| store.play_or_toggle(media.clone()),
                if is_playing {
                    Icon { name: "pause".to_string(), class: "w-4 h-4".to_string() }
                } else {
                    span { class: "group-hover:hidden", "{index + 1}" }
                    span { class: "hidden group-hover:inline",
                        Icon { name: "play".to_string(), class: "w-4 h-4".to_string() }
                    }
                }
            }
            if let Some(url) = artwork {
                img {
                    src: "{url}",
                    alt: "{track.title}",
                    class: "w-10 h-10 flex-shrink-0 object-cover rounded",
                }
            }
            div { class: "flex-1 min-w-0",
                div { class: if is_current { "font-medium truncate text-violet-300" } else { "font-medium truncate text-white" },
                    "{track.title}"
                }
                if let Some(artist) = &track.artist {
                    div { class: "text-sm text-zinc-400 truncate", "{artist}" }
                }
            }
            if let Some(album) = &track.album {
                div { class: "hidden md:block flex-1 min-w-0 text-sm text-zinc-500 truncate", "{album}" }
            }
            if let Some(duration) = &track.duration {
                div { class: "text-sm text-zinc-500 tabular-nums", "{duration}" }
            }
            button {
                class: "w-8 h-8 flex items-center justify-center opacity-0 group-hover:opacity-100 transition-opacity text-sky-400 disabled:opacity-40",
                aria_label: "Download",
                disabled: media_for_download.download_source().is_none() || downloads.is_busy(),
                onclick: move |_| downloads.start(client.clone(), media_for_download.clone()),
                if downloading {
                    Icon { name: "loader".to_string(), class: "w-4 h-4".to_string() }
                } else {
                    Icon { name: "download".to_string(), class: "w-4 h-4".to_string() }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_followers;

    #[test]
    fn followers_use_thousands_separators() {
        assert_eq!(format_followers(7), "7");
        assert_eq!(format_followers(1234), "1,234");
        assert_eq!(format_followers(1234567), "1,234,567");
    }
}
