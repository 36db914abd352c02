use crate::api::CatalogClient;
use crate::components::views::{DownloadsView, HomeView, SearchView};
use crate::components::{
    load_download_entries, use_media_binder, use_playback_mirror, view_label, AppView,
    DownloadsController, Icon, Navigation, PlaybackSignal, Player, ProgressSignal, Sidebar,
};
use crate::player::{PlaybackProgress, PlayerStore};
use dioxus::prelude::*;

#[component]
pub fn AppShell() -> Element {
    let current_view = use_signal(|| AppView::Home);
    let navigation_stack = use_signal(Vec::<AppView>::new);
    let navigation = Navigation::new(current_view, navigation_stack);
    let sidebar_open = use_signal(|| false);

    let store = use_hook(PlayerStore::new);
    let progress = use_signal(PlaybackProgress::default);
    let playback = use_playback_mirror(store.clone(), progress);
    let binder = use_media_binder(store.clone(), progress);

    let download_entries = use_signal(load_download_entries);
    let active_download = use_signal(|| None::<String>);
    let download_error = use_signal(|| None::<String>);
    let downloads = DownloadsController::new(download_entries, active_download, download_error);

    // Provide state via context
    use_context_provider(|| navigation);
    use_context_provider(|| current_view);
    use_context_provider(|| store.clone());
    use_context_provider(|| PlaybackSignal(playback));
    use_context_provider(|| ProgressSignal(progress));
    use_context_provider(|| binder.clone());
    use_context_provider(|| downloads);
    use_context_provider(CatalogClient::same_origin);

    let view = current_view();
    let can_go_back = navigation.can_go_back();

    rsx! {
        div { class: "app-container flex min-h-screen bg-zinc-950 text-white overflow-hidden",
            if sidebar_open() {
                div {
                    class: "fixed inset-0 bg-black/60 backdrop-blur-sm z-30 lg:hidden",
                    onclick: {
                        let mut sidebar_open = sidebar_open;
                        move |_| sidebar_open.set(false)
                    },
                }
            }

            Sidebar { sidebar_open }

            div { class: "flex-1 flex flex-col overflow-hidden",
                header { class: "lg:hidden border-b border-zinc-800/60 bg-zinc-950/80 backdrop-blur-xl",
                    div { class: "flex items-center justify-between px-4 py-3",
                        if can_go_back {
                            button {
                                class: "p-2 rounded-lg text-zinc-300 hover:text-white hover:bg-zinc-800/60 transition-colors",
                                aria_label: "Go back",
                                onclick: move |_| {
                                    let _ = navigation.go_back();
                                },
                                Icon {
                                    name: "arrow-left".to_string(),
                                    class: "w-5 h-5".to_string(),
                                }
                            }
                        } else {
                            button {
                                class: "p-2 rounded-lg text-zinc-300 hover:text-white hover:bg-zinc-800/60 transition-colors",
                                aria_label: "Open menu",
                                onclick: {
                                    let mut sidebar_open = sidebar_open;
                                    move |_| sidebar_open.set(true)
                                },
                                Icon {
                                    name: "music".to_string(),
                                    class: "w-5 h-5".to_string(),
                                }
                            }
                        }
                        div { class: "flex flex-col items-center text-center",
                            span { class: "text-xs uppercase tracking-widest text-zinc-500",
                                "Behimelobot"
                            }
                            span { class: "text-sm font-semibold text-white", "{view_label(&view)}" }
                        }
                        button {
                            class: "p-2 rounded-lg text-zinc-300 hover:text-white hover:bg-zinc-800/60 transition-colors",
                            aria_label: "Search",
                            onclick: move |_| navigation.search(""),
                            Icon {
                                name: "search".to_string(),
                                class: "w-5 h-5".to_string(),
                            }
                        }
                    }
                }

                main { class: "flex-1 overflow-y-auto pb-40 md:pb-28",
                    div { class: "max-w-7xl mx-auto px-4 md:px-8 py-8",
                        match view {
                            AppView::Home => rsx! { HomeView {} },
                            AppView::Search(query) => rsx! { SearchView { query } },
                            AppView::Downloads => rsx! { DownloadsView {} },
                        }
                    }
                }
            }

            Player {}
        }
    }
}
