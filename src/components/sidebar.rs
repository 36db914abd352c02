use dioxus::prelude::*;
use crate::components::{AppView, DownloadsController, Icon, Navigation};

#[component]
pub fn Sidebar(sidebar_open: Signal<bool>) -> Element {
    let navigation = use_context::<Navigation>();
    let downloads = use_context::<DownloadsController>();
    let view = navigation.current();
    let mut query = use_signal(String::new);

    let download_count = downloads.entries().len();
    let visibility = if sidebar_open() {
        "translate-x-0"
    } else {
        "-translate-x-full lg:translate-x-0"
    };

    let mut go = move |target: AppView| {
        navigation.navigate_to(target);
        sidebar_open.set(false);
    };

    rsx! {
        aside { class: "fixed lg:static inset-y-0 left-0 z-40 w-64 bg-zinc-950/95 border-r border-zinc-800/50 flex flex-col h-full backdrop-blur-xl transition-transform {visibility}",
            // Logo
            div { class: "p-6 border-b border-zinc-800/50",
                div { class: "flex items-center gap-3",
                    div { class: "w-10 h-10 rounded-xl bg-gradient-to-br from-violet-500 to-fuchsia-600 flex items-center justify-center text-white font-bold text-lg shadow-lg shadow-violet-500/20",
                        "B"
                    }
                    div {
                        h1 { class: "text-lg font-bold text-white", "Behimelobot" }
                        p { class: "text-xs text-zinc-500", "{download_count} downloaded" }
                    }
                }
            }

            form {
                class: "p-4",
                onsubmit: move |e: FormEvent| {
                    e.prevent_default();
                    let value = query();
                    if !value.trim().is_empty() {
                        go(AppView::Search(value.trim().to_string()));
                    }
                },
                div { class: "relative",
                    Icon {
                        name: "search".to_string(),
                        class: "absolute left-3 top-1/2 -translate-y-1/2 w-4 h-4 text-zinc-500".to_string(),
                    }
                    input {
                        r#type: "search",
                        placeholder: "Search songs, artists, albums...",
                        value: "{query}",
                        class: "w-full pl-10 pr-3 py-2 rounded-full bg-zinc-900 border border-zinc-800 text-sm text-white placeholder-zinc-500 focus:outline-none focus:ring-2 focus:ring-violet-500/60",
                        oninput: move |e| query.set(e.value()),
                    }
                }
            }

            nav { class: "flex-1 overflow-y-auto px-4 space-y-1",
                NavItem {
                    icon: "home",
                    label: "Home",
                    active: matches!(view, AppView::Home),
                    onclick: move |_| go(AppView::Home),
                }
                NavItem {
                    icon: "search",
                    label: "Search",
                    active: matches!(view, AppView::Search(_)),
                    onclick: move |_| go(AppView::Search(query().trim().to_string())),
                }
                NavItem {
                    icon: "download",
                    label: "Downloads",
                    active: matches!(view, AppView::Downloads),
                    onclick: move |_| go(AppView::Downloads),
                }
            }
        }
    }
}

#[component]
fn NavItem(icon: String, label: String, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let base_class = "flex items-center gap-3 px-3 py-2.5 rounded-xl text-sm font-medium transition-all duration-200 cursor-pointer";
    let active_class = if active {
        "bg-gradient-to-r from-violet-500/20 to-fuchsia-500/10 text-violet-300 shadow-sm"
    } else {
        "text-zinc-400 hover:text-white hover:bg-zinc-800/50"
    };

    rsx! {
        button {
            class: "{base_class} {active_class} w-full",
            onclick: move |e| onclick.call(e),
            Icon { name: icon.clone(), class: "w-5 h-5".to_string() }
            span { "{label}" }
        }
    }
}
