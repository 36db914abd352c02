use crate::media::MediaItem;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Volume the player starts with and the level restored by unmuting.
pub const DEFAULT_VOLUME: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current: Option<MediaItem>,
    pub is_playing: bool,
    pub volume: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            is_playing: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlaybackState {
    /// Play intent only counts while something is selected.
    pub fn wants_playback(&self) -> bool {
        self.current.is_some() && self.is_playing
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|item| item.id.as_str())
    }

    pub fn is_current(&self, id: &str) -> bool {
        self.current_id() == Some(id)
    }
}

/// What a single store mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// `select_media`. Carries whether the item identity changed, which is
    /// the only case that forces a reload.
    Selected { identity_changed: bool },
    PlayToggled,
    VolumeChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&PlaybackState, Mutation)>;

struct StoreInner {
    state: RefCell<PlaybackState>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
    // Mutations made while listeners run wait here until the current
    // round has reached every listener.
    pending: RefCell<VecDeque<(PlaybackState, Mutation)>>,
    notifying: Cell<bool>,
}

/// Shared playback state. Cloning hands out another handle to the same
/// store; it is passed explicitly to the UI and the binder.
#[derive(Clone)]
pub struct PlayerStore {
    inner: Rc<StoreInner>,
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PlayerStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::with_state(PlaybackState::default())
    }

    pub fn with_state(state: PlaybackState) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(state),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.inner.state.borrow().clone()
    }

    pub fn current(&self) -> Option<MediaItem> {
        self.inner.state.borrow().current.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.state.borrow().is_playing
    }

    pub fn volume(&self) -> f64 {
        self.inner.state.borrow().volume
    }

    /// Replaces the current item and forces play intent on.
    pub fn select_media(&self, item: MediaItem) {
        let identity_changed = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.current_id() != Some(item.id.as_str());
            state.current = Some(item);
            state.is_playing = true;
            changed
        };
        self.notify(Mutation::Selected { identity_changed });
    }

    pub fn toggle_play(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.is_playing = !state.is_playing;
        }
        self.notify(Mutation::PlayToggled);
    }

    /// Stores the level as given. Callers clamp to `[0, 1]`.
    pub fn set_volume(&self, volume: f64) {
        self.inner.state.borrow_mut().volume = volume;
        self.notify(Mutation::VolumeChanged);
    }

    /// Silences the player, or restores the default level when already
    /// silent. The level before muting is not remembered.
    pub fn toggle_mute(&self) {
        if self.volume() > 0.0 {
            self.set_volume(0.0);
        } else {
            self.set_volume(DEFAULT_VOLUME);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.volume() <= 0.0
    }

    /// Selects `item`, or toggles playback when it is already current.
    /// Track rows and download entries behave this way.
    pub fn play_or_toggle(&self, item: MediaItem) {
        if self.inner.state.borrow().is_current(&item.id) {
            self.toggle_play();
        } else {
            self.select_media(item);
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PlaybackState, Mutation) + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    // Each mutation reaches every listener, in order, with the state it
    // produced. A listener that mutates the store queues the follow-up
    // round instead of running it nested.
    fn notify(&self, mutation: Mutation) {
        self.inner
            .pending
            .borrow_mut()
            .push_back((self.snapshot(), mutation));
        if self.inner.notifying.replace(true) {
            return;
        }
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some((snapshot, mutation)) = next else {
                break;
            };
            let listeners: Vec<Listener> = self
                .inner
                .listeners
                .borrow()
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                listener(&snapshot, mutation);
            }
        }
        self.inner.notifying.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    fn song(id: &str) -> MediaItem {
        MediaItem::new(id, format!("Song {id}"), MediaKind::Song)
            .with_link(format!("https://x/{id}.mp3"))
    }

    #[test]
    fn starts_idle_at_default_volume() {
        let store = PlayerStore::new();
        let state = store.snapshot();
        assert!(state.current.is_none());
        assert!(!state.is_playing);
        assert_eq!(state.volume, DEFAULT_VOLUME);
        assert!(!state.wants_playback());
    }

    #[test]
    fn selecting_forces_play_intent() {
        let store = PlayerStore::new();
        store.select_media(song("1"));
        store.toggle_play();
        assert!(!store.is_playing());

        store.select_media(song("2"));
        let state = store.snapshot();
        assert_eq!(state.current_id(), Some("2"));
        assert!(state.is_playing);
    }

    #[test]
    fn selection_replaces_the_whole_item() {
        let store = PlayerStore::new();
        store.select_media(song("1").with_artist("Googoosh"));
        store.select_media(song("2"));
        assert_eq!(store.current().and_then(|item| item.artist), None);
    }

    #[test]
    fn toggling_twice_restores_intent() {
        let store = PlayerStore::new();
        store.select_media(song("1"));
        let before = store.is_playing();
        store.toggle_play();
        store.toggle_play();
        assert_eq!(store.is_playing(), before);
    }

    #[test]
    fn toggle_without_selection_is_harmless() {
        let store = PlayerStore::new();
        store.toggle_play();
        let state = store.snapshot();
        assert!(state.is_playing);
        assert!(!state.wants_playback());
    }

    #[test]
    fn volume_survives_selection() {
        let store = PlayerStore::new();
        store.set_volume(0.8);
        store.select_media(song("1"));
        store.select_media(song("2"));
        assert_eq!(store.volume(), 0.8);
    }

    #[test]
    fn unmute_restores_fixed_default() {
        let store = PlayerStore::new();
        store.set_volume(0.9);
        store.set_volume(0.0);
        store.toggle_mute();
        assert_eq!(store.volume(), DEFAULT_VOLUME);

        store.set_volume(0.9);
        store.toggle_mute();
        assert!(store.is_muted());
        store.toggle_mute();
        assert_eq!(store.volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn listeners_hear_every_mutation_in_order() {
        let store = PlayerStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            store.subscribe(move |state, mutation| {
                seen.borrow_mut().push((mutation, state.is_playing));
            });
        }

        store.select_media(song("1"));
        store.select_media(song("1"));
        store.toggle_play();
        store.set_volume(0.2);

        assert_eq!(
            *seen.borrow(),
            vec![
                (Mutation::Selected { identity_changed: true }, true),
                (Mutation::Selected { identity_changed: false }, true),
                (Mutation::PlayToggled, false),
                (Mutation::VolumeChanged, false),
            ]
        );
    }

    #[test]
    fn listener_may_mutate_the_store() {
        let store = PlayerStore::new();
        {
            let handle = store.clone();
            store.subscribe(move |state, mutation| {
                if mutation == (Mutation::Selected { identity_changed: true }) && state.is_playing {
                    handle.toggle_play();
                }
            });
        }
        store.select_media(song("1"));
        assert!(!store.is_playing());
    }

    #[test]
    fn nested_mutations_wait_for_the_current_round() {
        let store = PlayerStore::new();
        {
            let handle = store.clone();
            store.subscribe(move |_, mutation| {
                if mutation == (Mutation::Selected { identity_changed: true }) {
                    handle.toggle_play();
                }
            });
        }
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            store.subscribe(move |state, mutation| {
                seen.borrow_mut().push((mutation, state.is_playing));
            });
        }

        store.select_media(song("1"));
        assert_eq!(
            *seen.borrow(),
            vec![
                (Mutation::Selected { identity_changed: true }, true),
                (Mutation::PlayToggled, false),
            ]
        );
    }

    #[test]
    fn unsubscribed_listeners_are_silent() {
        let store = PlayerStore::new();
        let count = Rc::new(Cell::new(0));
        let id = {
            let count = count.clone();
            store.subscribe(move |_, _| count.set(count.get() + 1))
        };
        store.toggle_play();
        store.unsubscribe(id);
        store.toggle_play();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn play_or_toggle_only_toggles_the_current_item() {
        let store = PlayerStore::new();
        store.play_or_toggle(song("1"));
        assert!(store.is_playing());
        store.play_or_toggle(song("1"));
        assert!(!store.is_playing());
        store.play_or_toggle(song("2"));
        assert!(store.is_playing());
        assert_eq!(store.snapshot().current_id(), Some("2"));
    }
}
