//! Web UI components. Everything here runs inside the Dioxus runtime.

mod app;
mod app_view;
mod downloads_controller;
mod icons;
mod media_card;
mod media_controller;
mod navigation;
mod player;
mod sidebar;
pub mod views;

pub use app::AppShell;
pub use app_view::{view_label, AppView};
pub use downloads_controller::{load_download_entries, DownloadsController};
pub use icons::Icon;
pub use media_card::{MediaCard, MediaGrid, TrackList};
pub use media_controller::{
    use_media_binder, use_playback_mirror, BinderHandle, PlaybackSignal, ProgressSignal,
};
pub use navigation::Navigation;
pub use player::Player;
pub use sidebar::Sidebar;
