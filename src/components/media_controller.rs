//! Media controller - attaches the playback binder to the page's audio and
//! video elements and forwards their events.

use dioxus::prelude::*;
use std::rc::Rc;

use crate::player::{MediaBinder, Mutation, PlaybackProgress, PlaybackState, PlayerStore};

#[cfg(target_arch = "wasm32")]
use crate::media::SinkKind;
#[cfg(target_arch = "wasm32")]
use crate::player::HtmlMediaSink;
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

/// Mirror of the store state for rendering.
#[derive(Clone, Copy)]
pub struct PlaybackSignal(pub Signal<PlaybackState>);

/// Progress of the active sink.
#[derive(Clone, Copy)]
pub struct ProgressSignal(pub Signal<PlaybackProgress>);

/// The binder, when media elements could be created.
#[derive(Clone, Default)]
pub struct BinderHandle(Option<Rc<MediaBinder>>);

impl BinderHandle {
    /// Seeks the active sink and returns the resulting progress.
    pub fn seek_percent(&self, percent: f64) -> Option<PlaybackProgress> {
        let binder = self.0.as_ref()?;
        binder.seek_percent(percent)?;
        Some(binder.progress())
    }
}

#[cfg(target_arch = "wasm32")]
const VIDEO_SURFACE_CLASS: &str =
    "fixed right-4 bottom-32 md:bottom-28 w-80 max-w-[90vw] aspect-video rounded-xl bg-black shadow-2xl z-40";

/// Keeps a signal in step with the store. A new selection also resets the
/// progress shown until the sink reports again.
pub fn use_playback_mirror(
    store: PlayerStore,
    progress: Signal<PlaybackProgress>,
) -> Signal<PlaybackState> {
    let snapshot = store.snapshot();
    let mirror = use_signal(move || snapshot);
    use_hook(move || {
        store.subscribe(move |state, mutation| {
            let mut mirror = mirror;
            mirror.set(state.clone());
            if matches!(mutation, Mutation::Selected { identity_changed: true }) {
                let mut progress = progress;
                progress.set(PlaybackProgress::default());
            }
        });
    });
    mirror
}

pub fn use_media_binder(store: PlayerStore, progress: Signal<PlaybackProgress>) -> BinderHandle {
    use_hook(move || BinderHandle(attach_media_binder(store, progress)))
}

#[cfg(not(target_arch = "wasm32"))]
fn attach_media_binder(
    _store: PlayerStore,
    _progress: Signal<PlaybackProgress>,
) -> Option<Rc<MediaBinder>> {
    tracing::debug!("no media elements outside the browser");
    None
}

#[cfg(target_arch = "wasm32")]
fn attach_media_binder(
    store: PlayerStore,
    progress: Signal<PlaybackProgress>,
) -> Option<Rc<MediaBinder>> {
    let audio = HtmlMediaSink::create(SinkKind::Audio)?;
    let video = HtmlMediaSink::create(SinkKind::Video)?;
    let elements = [
        (SinkKind::Audio, audio.element()),
        (SinkKind::Video, video.element()),
    ];

    let video_element = video.element();
    let show_video = move |state: &PlaybackState| {
        let visible = state
            .current
            .as_ref()
            .is_some_and(|item| item.kind.sink() == SinkKind::Video);
        video_element.set_class_name(if visible { VIDEO_SURFACE_CLASS } else { "hidden" });
    };
    show_video(&store.snapshot());
    store.subscribe(move |state, _| show_video(state));

    let binder = Rc::new(MediaBinder::attach(
        store,
        Box::new(audio),
        Box::new(video),
    ));

    let runtime = Runtime::current();
    for (kind, element) in elements {
        // timeupdate and loadedmetadata share one handler
        let time_closure = {
            let binder = Rc::downgrade(&binder);
            let element = element.clone();
            let runtime = runtime.clone();
            let mut progress = progress;
            Closure::wrap(Box::new(move || {
                let Some(binder) = binder.upgrade() else {
                    return;
                };
                let _guard = RuntimeGuard::new(runtime.clone());
                let next = binder.handle_time_update(kind, element.current_time(), element.duration());
                let previous = *progress.peek();
                // ~5 updates per second is enough for the seek bar
                if (next.elapsed - previous.elapsed).abs() >= 0.2
                    || next.duration != previous.duration
                {
                    progress.set(next);
                }
            }) as Box<dyn FnMut()>)
        };
        element.set_ontimeupdate(Some(time_closure.as_ref().unchecked_ref()));
        element.set_onloadedmetadata(Some(time_closure.as_ref().unchecked_ref()));
        time_closure.forget();

        let end_closure = {
            let binder = Rc::downgrade(&binder);
            let runtime = runtime.clone();
            Closure::wrap(Box::new(move || {
                let Some(binder) = binder.upgrade() else {
                    return;
                };
                let _guard = RuntimeGuard::new(runtime.clone());
                binder.handle_ended(kind);
            }) as Box<dyn FnMut()>)
        };
        element.set_onended(Some(end_closure.as_ref().unchecked_ref()));
        end_closure.forget();
    }

    Some(binder)
}
