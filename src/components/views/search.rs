use crate::api::{CatalogClient, SearchResult, SearchTab};
use crate::components::views::home::ErrorCard;
use crate::components::{Icon, MediaGrid, TrackList};
use dioxus::prelude::*;

fn results_summary(total: usize, query: &str) -> String {
    if total == 0 {
        "No results found".to_string()
    } else {
        format!("Found {total} results for \"{query}\"")
    }
}

#[component]
pub fn SearchView(query: String) -> Element {
    let client = use_context::<CatalogClient>();
    let mut active_tab = use_signal(|| SearchTab::All);

    let mut results = use_resource(use_reactive!(|(query,)| {
        let client = client.clone();
        async move { client.search(&query).await }
    }));

    if query.trim().is_empty() {
        return rsx! {
            div { class: "flex flex-col items-center justify-center py-24 text-center",
                Icon { name: "search".to_string(), class: "w-12 h-12 text-zinc-600 mb-4".to_string() }
                h2 { class: "text-xl font-semibold text-white", "Search for music" }
                p { class: "text-zinc-500 mt-2", "Find songs, albums, artists, playlists, videos and podcasts" }
            }
        };
    }

    let body = match results() {
        None => rsx! {
            div { class: "flex items-center justify-center py-24",
                Icon { name: "loader".to_string(), class: "w-8 h-8 text-zinc-500".to_string() }
            }
        },
        Some(Err(err)) => rsx! {
            ErrorCard { error: err, on_retry: move |_| results.restart() }
        },
        Some(Ok(None)) => rsx! {},
        Some(Ok(Some(response))) => {
            let result = response.result;
            let tabs = result.tabs();
            let selected = if tabs.contains(&active_tab()) {
                active_tab()
            } else {
                SearchTab::All
            };
            rsx! {
                p { class: "text-zinc-400", "{results_summary(result.total(), &query)}" }
                if result.total() > 0 {
                    div { class: "flex flex-wrap gap-2",
                        for tab in tabs {
                            button {
                                key: "{tab.label()}",
                                class: if tab == selected { "px-4 py-1.5 rounded-full text-sm bg-violet-500 text-white" } else { "px-4 py-1.5 rounded-full text-sm bg-zinc-900 text-zinc-400 hover:text-white" },
                                onclick: move |_| active_tab.set(tab),
                                "{tab_caption(&result, tab)}"
                            }
                        }
                    }
                    SearchResults { result: result.clone(), tab: selected }
                }
            }
        }
    };

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-3xl font-bold text-white", "Search" }
            {body}
        }
    }
}

fn tab_caption(result: &SearchResult, tab: SearchTab) -> String {
    match tab {
        SearchTab::All => tab.label().to_string(),
        other => format!("{} ({})", other.label(), result.category(other).len()),
    }
}

#[component]
fn SearchResults(result: SearchResult, tab: SearchTab) -> Element {
    if tab != SearchTab::All {
        let items = result.category(tab).to_vec();
        return if tab == SearchTab::Songs {
            rsx! { TrackList { tracks: items } }
        } else {
            rsx! { MediaGrid { items } }
        };
    }

    let others: Vec<SearchTab> = SearchTab::CATEGORIES
        .into_iter()
        .filter(|tab| *tab != SearchTab::Songs && !result.category(*tab).is_empty())
        .collect();

    rsx! {
        div { class: "space-y-10",
            if !result.songs.is_empty() {
                section { class: "space-y-4",
                    h2 { class: "text-xl font-semibold text-white", "Songs" }
                    TrackList { tracks: result.songs.clone() }
                }
            }
            for category in others {
                section { key: "{category.label()}", class: "space-y-4",
                    h2 { class: "text-xl font-semibold text-white", "{category.label()}" }
                    MediaGrid { items: result.category(category).to_vec() }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogItem;

    #[test]
    fn summary_reports_count_and_query() {
        assert_eq!(results_summary(0, "x"), "No results found");
        assert_eq!(results_summary(3, "googoosh"), "Found 3 results for \"googoosh\"");
    }

    #[test]
    fn category_tabs_show_counts() {
        let result = SearchResult {
            songs: vec![CatalogItem::default(), CatalogItem::default()],
            ..SearchResult::default()
        };
        assert_eq!(tab_caption(&result, SearchTab::All), "All");
        assert_eq!(tab_caption(&result, SearchTab::Songs), "Songs (2)");
    }
}
