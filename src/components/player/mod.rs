use crate::components::{BinderHandle, DownloadsController, Icon, PlaybackSignal, ProgressSignal};
use crate::media::MediaKind;
use crate::player::{format_time, PlayerStore};
use dioxus::prelude::*;

mod controls;

use controls::{DownloadButton, MuteButton, PlayPauseButton};

/// Bottom player bar. Hidden until something is selected.
#[component]
pub fn Player() -> Element {
    let store = use_context::<PlayerStore>();
    let playback = use_context::<PlaybackSignal>().0;
    let mut progress = use_context::<ProgressSignal>().0;
    let binder = use_context::<BinderHandle>();
    let downloads = use_context::<DownloadsController>();

    let state = playback();
    let Some(current) = state.current.clone() else {
        return rsx! {};
    };
    let position = progress();

    let on_volume_change = {
        let store = store.clone();
        move |e: Event<FormData>| {
            if let Ok(val) = e.value().parse::<f64>() {
                store.set_volume((val / 100.0).clamp(0.0, 1.0));
            }
        }
    };

    let on_seek_input = move |e: Event<FormData>| {
        if let Ok(percent) = e.value().parse::<f64>() {
            if let Some(next) = binder.seek_percent(percent) {
                progress.set(next);
            }
        }
    };

    rsx! {
        if let Some(message) = downloads.error() {
            div { class: "fixed left-0 right-0 bottom-36 md:bottom-28 px-3 md:px-6 z-[60] flex justify-center",
                button {
                    class: "rounded-lg border border-rose-500/35 bg-rose-500/10 px-3 py-2 text-center text-xs text-rose-200 shadow-lg",
                    onclick: move |_| downloads.dismiss_error(),
                    "{message}"
                }
            }
        }
        div { class: "player-shell fixed bottom-0 left-0 right-0 bg-zinc-950/90 backdrop-blur-xl border-t border-zinc-800/60 z-50",
            // Progress bar
            input {
                r#type: "range",
                min: "0",
                max: "100",
                step: "0.1",
                disabled: !position.has_duration(),
                value: "{position.percent}",
                class: "absolute top-0 left-0 right-0 -translate-y-1/2 w-full h-1.5 appearance-none cursor-pointer accent-violet-500 bg-zinc-800",
                oninput: on_seek_input,
            }
            div { class: "max-w-7xl mx-auto px-4 py-3 flex items-center justify-between gap-4",
                // Now playing info
                div { class: "flex items-center gap-4 flex-1 min-w-0",
                    div { class: "w-14 h-14 flex-shrink-0 rounded-md overflow-hidden bg-zinc-800",
                        match &current.photo {
                            Some(url) => rsx! {
                                img {
                                    src: "{url}",
                                    alt: "{current.title}",
                                    class: "w-full h-full object-cover",
                                }
                            },
                            None => rsx! {
                                div { class: "w-full h-full flex items-center justify-center",
                                    Icon {
                                        name: if current.kind == MediaKind::Video { "video".to_string() } else { "music".to_string() },
                                        class: "w-6 h-6 text-zinc-500".to_string(),
                                    }
                                }
                            },
                        }
                    }
                    div { class: "flex-1 min-w-0",
                        p { class: "font-semibold text-white truncate", "{current.title}" }
                        if let Some(artist) = &current.artist {
                            p { class: "text-sm text-zinc-400 truncate", "{artist}" }
                        }
                    }
                }

                PlayPauseButton {}

                div { class: "hidden md:flex items-center gap-4 flex-1 justify-end",
                    span { class: "text-sm text-zinc-400 tabular-nums",
                        "{format_time(position.elapsed)} / {format_time(position.duration)}"
                    }
                    div { class: "flex items-center gap-2",
                        MuteButton {}
                        input {
                            r#type: "range",
                            min: "0",
                            max: "100",
                            value: (state.volume * 100.0).round() as i32,
                            class: "w-24 h-1.5 bg-zinc-800 rounded-full appearance-none cursor-pointer accent-zinc-400",
                            oninput: on_volume_change,
                        }
                    }
                    DownloadButton {}
                }
            }
        }
    }
}
