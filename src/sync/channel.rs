//! Save-change broadcast between same-page controls and sibling tabs.
//!
//! DESIGN
//! ======
//! The shared storage key is a signal, not a record. Writing it fires a
//! `storage` event in every *other* tab of the origin; the writer never sees
//! its own write. The key is removed one task later so the next identical
//! payload still counts as a mutation. Receivers decode the payload from the
//! event itself and never read the key back.
//!
//! Payloads are versioned (`v`). Decoders accept unversioned legacy payloads
//! and ignore unknown fields.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use serde::{Deserialize, Serialize};

use super::cache::KeyValueStore;

/// Current broadcast schema version.
pub const PAYLOAD_VERSION: u32 = 1;

fn legacy_version() -> u32 {
    0
}

/// One save change, as carried by the in-page event and the storage signal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveBroadcast {
    #[serde(default = "legacy_version")]
    pub v: u32,
    pub id: u32,
    pub saved: bool,
    #[serde(default)]
    pub t: f64,
}

impl SaveBroadcast {
    #[must_use]
    pub fn new(id: u32, saved: bool, t: f64) -> Self {
        Self {
            v: PAYLOAD_VERSION,
            id,
            saved,
            t,
        }
    }

    /// Serialize for the storage signal or the event detail.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a payload. Malformed JSON, a non-boolean `saved` or a
    /// non-positive `id` drop the message.
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .filter(|msg| msg.id > 0)
    }
}

/// Publish side of the save channel.
pub trait SaveChannel {
    /// Deliver `message` to same-page listeners and sibling tabs.
    ///
    /// The engine has already painted this page's chips when it publishes,
    /// so a same-page listener that feeds the message back through
    /// [`SaveSync::on_page_event`](super::engine::SaveSync::on_page_event)
    /// repaints to the same state.
    fn publish(&self, message: &SaveBroadcast);
}

/// Filter a raw storage notification down to a save broadcast.
///
/// Notifications for other keys, removals (`new_value == None`) and empty
/// writes are ignored.
#[must_use]
pub fn decode_signal(
    channel_key: &str,
    key: Option<&str>,
    new_value: Option<&str>,
) -> Option<SaveBroadcast> {
    if key != Some(channel_key) {
        return None;
    }
    let raw = new_value.filter(|v| !v.is_empty())?;
    SaveBroadcast::decode(raw)
}

/// Schedules a task for a later turn of the event loop.
pub type Defer = Box<dyn Fn(Box<dyn FnOnce()>)>;

/// Cross-tab half of the channel: a write-then-remove signal on a shared key.
pub struct StorageRelay<S> {
    store: S,
    key: String,
    defer: Defer,
}

impl<S> StorageRelay<S>
where
    S: KeyValueStore + Clone + 'static,
{
    pub fn new(store: S, key: impl Into<String>, defer: Defer) -> Self {
        Self {
            store,
            key: key.into(),
            defer,
        }
    }

    /// Write `message` to the shared key and schedule its removal.
    pub fn signal(&self, message: &SaveBroadcast) {
        if let Err(e) = self.store.set(&self.key, &message.encode()) {
            leptos::logging::warn!("save signal not written: {e}");
            return;
        }
        let store = self.store.clone();
        let key = self.key.clone();
        (self.defer)(Box::new(move || store.remove(&key)));
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}
