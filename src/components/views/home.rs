use crate::api::{CatalogClient, CatalogError, Section, SectionKind};
use crate::components::{Icon, MediaGrid};
use dioxus::prelude::*;

#[component]
pub fn HomeView() -> Element {
    let client = use_context::<CatalogClient>();

    let mut home = use_resource(move || {
        let client = client.clone();
        async move {
            let response = client.home().await;
            if let Err(err) = &response {
                tracing::warn!(error = %err, "home feed failed");
            }
            response
        }
    });

    let body = match home() {
        None => rsx! {
            div { class: "flex items-center justify-center py-24",
                Icon { name: "loader".to_string(), class: "w-8 h-8 text-zinc-500".to_string() }
            }
        },
        Some(Err(err)) => rsx! {
            ErrorCard { error: err, on_retry: move |_| home.restart() }
        },
        Some(Ok(response)) => {
            let sections: Vec<Section> = response
                .result
                .sections
                .into_iter()
                .filter(Section::is_renderable)
                .collect();
            rsx! {
                if sections.is_empty() {
                    div { class: "text-center py-24 text-zinc-500", "Nothing to show right now" }
                }
                for section in sections {
                    HomeSection { key: "{section.id}", section }
                }
            }
        }
    };

    rsx! {
        div { class: "space-y-10",
            header {
                h1 { class: "text-3xl font-bold text-white", "Discover" }
                p { class: "text-zinc-400 mt-1", "Fresh picks from Radio Javan" }
            }
            {body}
        }
    }
}

#[component]
fn HomeSection(section: Section) -> Element {
    match section.kind() {
        SectionKind::Header => rsx! {
            h2 { class: "text-2xl font-bold text-white pt-4",
                "{section.title.clone().unwrap_or_default()}"
            }
        },
        SectionKind::SliderSquare => rsx! {
            section { class: "space-y-4",
                if let Some(title) = &section.title {
                    h3 { class: "text-lg font-semibold text-zinc-200", "{title}" }
                }
                MediaGrid { items: section.items().to_vec() }
            }
        },
        SectionKind::Other(_) => rsx! {},
    }
}

#[component]
pub(super) fn ErrorCard(error: CatalogError, on_retry: EventHandler<MouseEvent>) -> Element {
    rsx! {
        div { class: "max-w-md mx-auto mt-16 rounded-xl border border-rose-500/30 bg-rose-500/5 p-6 text-center",
            h3 { class: "text-lg font-semibold text-rose-200 mb-2", "Something went wrong" }
            p { class: "text-sm text-zinc-400 mb-4", "{error.user_message()}" }
            button {
                class: "px-4 py-2 rounded-lg bg-violet-500 hover:bg-violet-400 text-white text-sm font-medium transition-colors",
                onclick: move |e| on_retry.call(e),
                "Retry"
            }
        }
    }
}
