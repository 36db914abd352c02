//! Defines the shared application view state.

#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Home,
    /// Search results for a query; empty shows the search prompt.
    Search(String),
    Downloads,
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::Home => "Home",
        AppView::Search(_) => "Search",
        AppView::Downloads => "Downloads",
    }
}
