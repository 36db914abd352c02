mod downloads;
mod home;
mod search;

pub use downloads::DownloadsView;
pub use home::HomeView;
pub use search::SearchView;
