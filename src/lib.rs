//! Behimelobot: a Persian music browser. The library holds the playback
//! core, the catalog client and models, download bookkeeping, the catalog
//! proxy server and the Dioxus front end.

pub mod api;
pub mod db;
pub mod downloads;
pub mod media;
pub mod player;

#[cfg(all(feature = "server", not(target_arch = "wasm32")))]
pub mod server;

#[cfg(feature = "web")]
pub mod components;
