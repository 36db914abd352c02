//! Keeps the audio and video sinks in line with the [`PlayerStore`].
//!
//! Three reactions run off store notifications: a new item reloads the
//! sink for its kind, a play toggle starts or pauses the active sink, and a
//! volume change is applied as-is. Sink events flow back in through
//! [`MediaBinder::handle_time_update`] and [`MediaBinder::handle_ended`].

use super::sink::{MediaSink, PlayResult, SinkError};
use super::store::{Mutation, PlaybackState, PlayerStore, SubscriptionId};
use super::timing::{seek_target, PlaybackProgress};
use crate::media::{MediaItem, Playable, SinkKind};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct BinderInner {
    audio: Box<dyn MediaSink>,
    video: Box<dyn MediaSink>,
    active: Option<SinkKind>,
    loaded_id: Option<String>,
    intent: bool,
    // Bumped on every load; play completions from older loads are dropped.
    generation: u64,
    progress: PlaybackProgress,
    weak_self: Weak<RefCell<BinderInner>>,
}

impl BinderInner {
    fn sink_mut(&mut self, kind: SinkKind) -> &mut dyn MediaSink {
        match kind {
            SinkKind::Audio => self.audio.as_mut(),
            SinkKind::Video => self.video.as_mut(),
        }
    }

    fn sink(&self, kind: SinkKind) -> &dyn MediaSink {
        match kind {
            SinkKind::Audio => self.audio.as_ref(),
            SinkKind::Video => self.video.as_ref(),
        }
    }

    fn react(&mut self, state: &PlaybackState, mutation: Mutation) {
        let was_playing = self.intent;
        self.intent = state.is_playing;

        match mutation {
            Mutation::Selected {
                identity_changed: true,
            } => {
                if let Some(item) = state.current.as_ref() {
                    self.load(item, state.volume);
                }
            }
            Mutation::Selected {
                identity_changed: false,
            } => {
                if !was_playing && state.is_playing {
                    self.request_play();
                }
            }
            Mutation::PlayToggled => {
                if state.current.is_none() {
                    return;
                }
                if state.is_playing {
                    self.request_play();
                } else if let Some(kind) = self.active {
                    self.sink_mut(kind).pause();
                }
            }
            Mutation::VolumeChanged => {
                if let Some(kind) = self.active {
                    self.sink_mut(kind).set_volume(state.volume);
                }
            }
        }
    }

    fn load(&mut self, item: &MediaItem, volume: f64) {
        let kind = item.media_kind().sink();
        if self.active != Some(kind) {
            if let Some(previous) = self.active {
                let sink = self.sink_mut(previous);
                sink.pause();
                sink.clear();
            }
            self.active = Some(kind);
            self.sink_mut(kind).set_volume(volume);
        }

        self.generation = self.generation.wrapping_add(1);
        self.loaded_id = Some(item.id.clone());
        self.progress = PlaybackProgress::default();

        match item.playback_source() {
            Some(source) => {
                let source = source.to_string();
                self.sink_mut(kind).load(&source);
                if self.intent {
                    self.request_play();
                }
            }
            None => {
                tracing::info!(media_id = %item.id, "selected item has no playable source");
                let sink = self.sink_mut(kind);
                sink.pause();
                sink.clear();
            }
        }
    }

    fn request_play(&mut self) {
        let Some(kind) = self.active else {
            return;
        };
        let Some(source) = self.sink(kind).source() else {
            return;
        };
        let generation = self.generation;
        let weak = self.weak_self.clone();
        self.sink_mut(kind).play(Box::new(move |result| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match inner.try_borrow_mut() {
                Ok(mut inner) => inner.settle_play(generation, &source, result),
                Err(_) => tracing::warn!("play completion arrived while the binder was busy"),
            };
        }));
    }

    fn settle_play(&mut self, generation: u64, source: &str, result: PlayResult) {
        let still_current = generation == self.generation
            && self
                .active
                .map(|kind| self.sink(kind).source().as_deref() == Some(source))
                .unwrap_or(false);
        if !still_current {
            tracing::debug!(source, "dropping play completion for a superseded source");
            return;
        }

        match result {
            Ok(()) => {
                // Paused while the request was pending.
                if !self.intent {
                    if let Some(kind) = self.active {
                        self.sink_mut(kind).pause();
                    }
                }
            }
            Err(SinkError::Rejected(reason)) | Err(SinkError::Interrupted(reason)) => {
                tracing::warn!(source, %reason, "sink refused to start playback");
            }
        }
    }
}

/// Owns both sinks and reconciles them with the store for as long as it
/// lives.
pub struct MediaBinder {
    store: PlayerStore,
    inner: Rc<RefCell<BinderInner>>,
    subscription: SubscriptionId,
}

impl MediaBinder {
    pub fn attach(
        store: PlayerStore,
        mut audio: Box<dyn MediaSink>,
        mut video: Box<dyn MediaSink>,
    ) -> Self {
        let state = store.snapshot();
        audio.set_volume(state.volume);
        video.set_volume(state.volume);

        let inner = Rc::new_cyclic(|weak_self| {
            RefCell::new(BinderInner {
                audio,
                video,
                active: None,
                loaded_id: None,
                intent: state.is_playing,
                generation: 0,
                progress: PlaybackProgress::default(),
                weak_self: weak_self.clone(),
            })
        });

        if let Some(item) = state.current.as_ref() {
            inner.borrow_mut().load(item, state.volume);
        }

        let weak = Rc::downgrade(&inner);
        let subscription = store.subscribe(move |state, mutation| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().react(state, mutation);
            }
        });

        Self {
            store,
            inner,
            subscription,
        }
    }

    pub fn store(&self) -> &PlayerStore {
        &self.store
    }

    pub fn active_sink(&self) -> Option<SinkKind> {
        self.inner.borrow().active
    }

    pub fn loaded_id(&self) -> Option<String> {
        self.inner.borrow().loaded_id.clone()
    }

    pub fn progress(&self) -> PlaybackProgress {
        self.inner.borrow().progress
    }

    /// Periodic position report from a sink. Reports from the inactive sink
    /// are ignored.
    pub fn handle_time_update(&self, from: SinkKind, elapsed: f64, duration: f64) -> PlaybackProgress {
        let mut inner = self.inner.borrow_mut();
        if inner.active == Some(from) {
            inner.progress = PlaybackProgress::from_sink(elapsed, duration);
        }
        inner.progress
    }

    /// Natural end of media. Flips play intent off through the store; there
    /// is no queue to advance.
    pub fn handle_ended(&self, from: SinkKind) {
        if self.inner.borrow().active != Some(from) {
            return;
        }
        let state = self.store.snapshot();
        if state.wants_playback() {
            self.store.toggle_play();
        }
    }

    /// Moves the active sink to `percent` of the known duration. Play
    /// intent is untouched.
    pub fn seek_percent(&self, percent: f64) -> Option<f64> {
        let mut inner = self.inner.borrow_mut();
        let kind = inner.active?;
        let duration = inner.progress.duration;
        let target = seek_target(percent, duration)?;
        inner.sink_mut(kind).seek(target);
        inner.progress = PlaybackProgress::from_sink(target, duration);
        Some(target)
    }
}

impl Drop for MediaBinder {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use crate::player::sink::PlayCallback;

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Load(String),
        Clear,
        Play,
        Pause,
        Seek(f64),
        Volume(f64),
    }

    #[derive(Default)]
    struct SinkLog {
        commands: Vec<Command>,
        source: Option<String>,
        pending: Vec<PlayCallback>,
    }

    struct RecordingSink {
        kind: SinkKind,
        log: Rc<RefCell<SinkLog>>,
    }

    impl MediaSink for RecordingSink {
        fn kind(&self) -> SinkKind {
            self.kind
        }

        fn load(&mut self, uri: &str) {
            let mut log = self.log.borrow_mut();
            log.source = Some(uri.to_string());
            log.commands.push(Command::Load(uri.to_string()));
        }

        fn clear(&mut self) {
            let mut log = self.log.borrow_mut();
            log.source = None;
            log.commands.push(Command::Clear);
        }

        fn play(&mut self, done: PlayCallback) {
            let mut log = self.log.borrow_mut();
            log.commands.push(Command::Play);
            log.pending.push(done);
        }

        fn pause(&mut self) {
            self.log.borrow_mut().commands.push(Command::Pause);
        }

        fn seek(&mut self, position: f64) {
            self.log.borrow_mut().commands.push(Command::Seek(position));
        }

        fn set_volume(&mut self, volume: f64) {
            self.log.borrow_mut().commands.push(Command::Volume(volume));
        }

        fn source(&self) -> Option<String> {
            self.log.borrow().source.clone()
        }
    }

    struct Rig {
        store: PlayerStore,
        binder: MediaBinder,
        audio: Rc<RefCell<SinkLog>>,
        video: Rc<RefCell<SinkLog>>,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_store(PlayerStore::new())
        }

        fn with_store(store: PlayerStore) -> Self {
            let audio = Rc::new(RefCell::new(SinkLog::default()));
            let video = Rc::new(RefCell::new(SinkLog::default()));
            let binder = MediaBinder::attach(
                store.clone(),
                Box::new(RecordingSink {
                    kind: SinkKind::Audio,
                    log: audio.clone(),
                }),
                Box::new(RecordingSink {
                    kind: SinkKind::Video,
                    log: video.clone(),
                }),
            );
            audio.borrow_mut().commands.clear();
            video.borrow_mut().commands.clear();
            Self {
                store,
                binder,
                audio,
                video,
            }
        }

        fn audio_commands(&self) -> Vec<Command> {
            std::mem::take(&mut self.audio.borrow_mut().commands)
        }

        fn video_commands(&self) -> Vec<Command> {
            std::mem::take(&mut self.video.borrow_mut().commands)
        }

        fn take_pending(log: &Rc<RefCell<SinkLog>>) -> Vec<PlayCallback> {
            std::mem::take(&mut log.borrow_mut().pending)
        }
    }

    fn song(id: &str, link: &str) -> MediaItem {
        MediaItem::new(id, format!("Song {id}"), MediaKind::Song).with_link(link)
    }

    #[test]
    fn selecting_loads_then_plays() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));

        let state = rig.store.snapshot();
        assert_eq!(state.current_id(), Some("1"));
        assert!(state.is_playing);
        assert_eq!(
            rig.audio_commands(),
            vec![
                Command::Volume(0.5),
                Command::Load("https://x/a.mp3".to_string()),
                Command::Play,
            ]
        );
        assert!(rig.video_commands().is_empty());
        assert_eq!(rig.binder.active_sink(), Some(SinkKind::Audio));
    }

    #[test]
    fn earlier_listener_pausing_on_select_leaves_sink_paused() {
        let store = PlayerStore::new();
        {
            let handle = store.clone();
            store.subscribe(move |_, mutation| {
                if mutation == (Mutation::Selected { identity_changed: true }) {
                    handle.toggle_play();
                }
            });
        }
        let rig = Rig::with_store(store);

        rig.store.select_media(song("1", "https://x/a.mp3"));

        assert!(!rig.store.is_playing());
        let commands = rig.audio_commands();
        assert_eq!(commands.last(), Some(&Command::Pause));
        assert!(commands.contains(&Command::Load("https://x/a.mp3".to_string())));
    }

    #[test]
    fn toggling_pauses_without_reloading() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.audio_commands();

        rig.store.toggle_play();
        assert_eq!(rig.audio_commands(), vec![Command::Pause]);
        rig.store.toggle_play();
        assert_eq!(rig.audio_commands(), vec![Command::Play]);
    }

    #[test]
    fn volume_goes_straight_to_the_active_sink() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.audio_commands();

        rig.store.set_volume(0.25);
        assert_eq!(rig.audio_commands(), vec![Command::Volume(0.25)]);
        assert!(rig.video_commands().is_empty());
    }

    #[test]
    fn ended_flips_intent_off_and_keeps_item() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.audio_commands();

        rig.binder.handle_ended(SinkKind::Audio);
        let state = rig.store.snapshot();
        assert!(!state.is_playing);
        assert_eq!(state.current_id(), Some("1"));
        assert_eq!(rig.audio_commands(), vec![Command::Pause]);

        // A second end event while paused must not restart playback.
        rig.binder.handle_ended(SinkKind::Audio);
        assert!(!rig.store.is_playing());
    }

    #[test]
    fn ended_from_inactive_sink_is_ignored() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.binder.handle_ended(SinkKind::Video);
        assert!(rig.store.is_playing());
    }

    #[test]
    fn switching_kind_tears_down_previous_sink_first() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.audio_commands();

        let clip = MediaItem::new("2", "Clip", MediaKind::Video).with_hq_link("https://x/v.mp4");
        rig.store.select_media(clip);

        assert_eq!(rig.audio_commands(), vec![Command::Pause, Command::Clear]);
        assert_eq!(rig.audio.borrow().source, None);
        assert_eq!(
            rig.video_commands(),
            vec![
                Command::Volume(0.5),
                Command::Load("https://x/v.mp4".to_string()),
                Command::Play,
            ]
        );
        assert_eq!(rig.binder.active_sink(), Some(SinkKind::Video));
    }

    #[test]
    fn podcasts_share_the_audio_sink() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.audio_commands();

        let episode = MediaItem::new("p", "Episode", MediaKind::Podcast).with_link("https://x/p.mp3");
        rig.store.select_media(episode);
        assert_eq!(
            rig.audio_commands(),
            vec![Command::Load("https://x/p.mp3".to_string()), Command::Play]
        );
    }

    #[test]
    fn streaming_only_item_plays_its_stream() {
        let rig = Rig::new();
        let live = MediaItem::new("s", "Live", MediaKind::Song).with_hls_link("https://x/s.m3u8");
        rig.store.select_media(live);
        assert_eq!(rig.audio.borrow().source.as_deref(), Some("https://x/s.m3u8"));
    }

    #[test]
    fn item_without_sources_silences_the_sink() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.audio_commands();

        rig.store.select_media(MediaItem::new("2", "Nothing", MediaKind::Song));
        assert_eq!(rig.audio_commands(), vec![Command::Pause, Command::Clear]);
        assert!(rig.store.is_playing());

        rig.store.toggle_play();
        rig.store.toggle_play();
        assert_eq!(rig.audio_commands(), vec![Command::Pause]);
    }

    #[test]
    fn reselecting_paused_item_resumes_without_reload() {
        let rig = Rig::new();
        let item = song("1", "https://x/a.mp3");
        rig.store.select_media(item.clone());
        rig.store.toggle_play();
        rig.audio_commands();

        rig.store.select_media(item);
        assert_eq!(rig.audio_commands(), vec![Command::Play]);
    }

    #[test]
    fn new_selection_after_pause_reloads_and_plays() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.store.toggle_play();
        rig.audio_commands();

        rig.store.select_media(song("2", "https://x/b.mp3"));
        assert!(rig.store.is_playing());
        assert_eq!(
            rig.audio_commands(),
            vec![Command::Load("https://x/b.mp3".to_string()), Command::Play]
        );
    }

    #[test]
    fn stale_play_completion_is_dropped() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        let first = Rig::take_pending(&rig.audio);
        rig.store.select_media(song("2", "https://x/b.mp3"));
        rig.store.toggle_play();
        rig.audio_commands();

        // The first request resolves late; the user has since paused item 2.
        for done in first {
            done(Ok(()));
        }
        assert!(rig.audio_commands().is_empty());
        assert_eq!(rig.audio.borrow().source.as_deref(), Some("https://x/b.mp3"));
    }

    #[test]
    fn completion_after_pause_reconciles_to_paused() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        let pending = Rig::take_pending(&rig.audio);
        rig.store.toggle_play();
        rig.audio_commands();

        for done in pending {
            done(Ok(()));
        }
        assert_eq!(rig.audio_commands(), vec![Command::Pause]);
    }

    #[test]
    fn rejected_start_keeps_play_intent() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.audio_commands();

        for done in Rig::take_pending(&rig.audio) {
            done(Err(SinkError::Rejected("NotAllowedError".to_string())));
        }
        assert!(rig.store.is_playing());
        assert!(rig.audio_commands().is_empty());
    }

    #[test]
    fn time_updates_derive_progress() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));

        let early = rig.binder.handle_time_update(SinkKind::Audio, 1.0, f64::NAN);
        assert_eq!(early.percent, 0.0);

        let progress = rig.binder.handle_time_update(SinkKind::Audio, 45.0, 180.0);
        assert_eq!(progress.percent, 25.0);

        let ignored = rig.binder.handle_time_update(SinkKind::Video, 90.0, 100.0);
        assert_eq!(ignored, progress);
    }

    #[test]
    fn seeking_uses_known_duration_and_keeps_intent() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.store.toggle_play();
        rig.audio_commands();

        assert_eq!(rig.binder.seek_percent(50.0), None);
        rig.binder.handle_time_update(SinkKind::Audio, 10.0, 120.0);
        assert_eq!(rig.binder.seek_percent(50.0), Some(60.0));
        assert_eq!(rig.audio_commands(), vec![Command::Seek(60.0)]);
        assert_eq!(rig.binder.progress().percent, 50.0);
        assert!(!rig.store.is_playing());
    }

    #[test]
    fn new_selection_resets_progress() {
        let rig = Rig::new();
        rig.store.select_media(song("1", "https://x/a.mp3"));
        rig.binder.handle_time_update(SinkKind::Audio, 10.0, 120.0);
        rig.store.select_media(song("2", "https://x/b.mp3"));
        assert_eq!(rig.binder.progress(), PlaybackProgress::default());
        assert_eq!(rig.binder.loaded_id().as_deref(), Some("2"));
    }

    #[test]
    fn attaching_late_loads_the_current_item() {
        let store = PlayerStore::new();
        store.select_media(song("1", "https://x/a.mp3"));
        let audio = Rc::new(RefCell::new(SinkLog::default()));
        let _binder = MediaBinder::attach(
            store.clone(),
            Box::new(RecordingSink {
                kind: SinkKind::Audio,
                log: audio.clone(),
            }),
            Box::new(RecordingSink {
                kind: SinkKind::Video,
                log: Rc::new(RefCell::new(SinkLog::default())),
            }),
        );
        assert_eq!(audio.borrow().source.as_deref(), Some("https://x/a.mp3"));
        assert!(audio.borrow().commands.contains(&Command::Play));
    }

    #[test]
    fn dropping_the_binder_stops_reconciliation() {
        let rig = Rig::new();
        let Rig {
            store,
            binder,
            audio,
            ..
        } = rig;
        drop(binder);
        store.select_media(song("1", "https://x/a.mp3"));
        assert!(audio.borrow().commands.is_empty());
    }
}
