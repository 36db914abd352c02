use super::sink::{MediaSink, PlayCallback, SinkError};
use crate::media::SinkKind;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, HtmlMediaElement};

fn element_id(kind: SinkKind) -> &'static str {
    match kind {
        SinkKind::Audio => "behimelobot-audio",
        SinkKind::Video => "behimelobot-video",
    }
}

/// Finds or creates the hidden `<audio>`/`<video>` element for `kind`.
pub fn get_or_create_media_element(kind: SinkKind) -> Option<HtmlMediaElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(element_id(kind)) {
        return existing.dyn_into::<HtmlMediaElement>().ok();
    }

    let tag = match kind {
        SinkKind::Audio => "audio",
        SinkKind::Video => "video",
    };
    let element: HtmlMediaElement = document.create_element(tag).ok()?.dyn_into().ok()?;
    element.set_id(element_id(kind));
    // Keep preload light so we stream instead of buffering entire files
    element.set_attribute("preload", "metadata").ok()?;
    element.set_attribute("class", "hidden").ok()?;
    document.body()?.append_child(&element).ok()?;

    Some(element)
}

fn js_error_message(error: &JsValue) -> String {
    if let Some(text) = error.as_string() {
        return text;
    }
    js_sys::Reflect::get(error, &"name".into())
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

/// Sink backed by a DOM media element.
pub struct HtmlMediaSink {
    kind: SinkKind,
    element: HtmlMediaElement,
    source: Option<String>,
}

impl HtmlMediaSink {
    pub fn create(kind: SinkKind) -> Option<Self> {
        Some(Self {
            kind,
            element: get_or_create_media_element(kind)?,
            source: None,
        })
    }

    pub fn element(&self) -> HtmlMediaElement {
        self.element.clone()
    }
}

impl MediaSink for HtmlMediaSink {
    fn kind(&self) -> SinkKind {
        self.kind
    }

    fn load(&mut self, uri: &str) {
        self.element.set_src(uri);
        self.element.load();
        self.source = Some(uri.to_string());
    }

    fn clear(&mut self) {
        let _ = self.element.pause();
        self.element.set_src("");
        let _ = self.element.remove_attribute("src");
        self.element.load();
        self.source = None;
    }

    fn play(&mut self, done: PlayCallback) {
        match self.element.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let result = wasm_bindgen_futures::JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|err| SinkError::Rejected(js_error_message(&err)));
                done(result);
            }),
            Err(err) => {
                let message = js_error_message(&err);
                wasm_bindgen_futures::spawn_local(async move {
                    done(Err(SinkError::Interrupted(message)));
                });
            }
        }
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn seek(&mut self, position: f64) {
        self.element.set_current_time(position.max(0.0));
    }

    fn set_volume(&mut self, volume: f64) {
        // The element throws outside [0, 1]; the store itself does not clamp.
        self.element.set_volume(volume.clamp(0.0, 1.0));
    }

    fn source(&self) -> Option<String> {
        self.source.clone()
    }
}
