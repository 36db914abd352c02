use behimelobot::components::AppShell;
use dioxus::prelude::*;

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Behimelobot" }
        document::Meta { name: "theme-color", content: "#7c3aed" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "Behimelobot" }
        document::Script { src: "https://cdn.tailwindcss.com" }

        AppShell {}
    }
}
