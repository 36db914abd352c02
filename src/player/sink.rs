use crate::media::SinkKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The sink refused to start, typically for lack of a user gesture.
    #[error("playback was rejected: {0}")]
    Rejected(String),
    #[error("playback was interrupted: {0}")]
    Interrupted(String),
}

pub type PlayResult = Result<(), SinkError>;

/// Deferred completion of a play request.
pub type PlayCallback = Box<dyn FnOnce(PlayResult)>;

/// A time-based playback primitive. Only the binder drives sinks.
pub trait MediaSink {
    fn kind(&self) -> SinkKind;

    /// Assigns `uri` and resets buffering and position.
    fn load(&mut self, uri: &str);

    /// Detaches the current source entirely.
    fn clear(&mut self);

    /// Begins playback. `done` reports the outcome and must run after this
    /// call returns, never inside it.
    fn play(&mut self, done: PlayCallback);

    fn pause(&mut self);

    fn seek(&mut self, position: f64);

    fn set_volume(&mut self, volume: f64);

    /// The source currently assigned, if any.
    fn source(&self) -> Option<String>;
}
