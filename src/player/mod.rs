//! Client-side playback core: the shared store, the sink abstraction and
//! the binder that reconciles one with the other.

mod binder;
mod sink;
mod store;
mod timing;
#[cfg(target_arch = "wasm32")]
mod web_sink;

pub use binder::MediaBinder;
pub use sink::{MediaSink, PlayCallback, PlayResult, SinkError};
pub use store::{Mutation, PlaybackState, PlayerStore, SubscriptionId, DEFAULT_VOLUME};
pub use timing::{format_time, seek_target, PlaybackProgress};
#[cfg(target_arch = "wasm32")]
pub use web_sink::{get_or_create_media_element, HtmlMediaSink};
