use crate::error::AppResult;
use crate::events::{InboundEvent, MESSAGE_TYPE_PING, MESSAGE_TYPE_PLAYER_STATE};
use crate::session::controller::ControllerHandle;
use std::collections::HashMap;

pub const FIELD_TYPE: &str = "type";
pub const FIELD_PLAYBACK_STATE: &str = "playbackState";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_ARTIST: &str = "artist";

/// Routes raw push data maps to the session controller by their `type` tag.
pub struct PushDispatcher;

impl PushDispatcher {
    pub fn decode(data: &HashMap<String, String>) -> Option<InboundEvent> {
        match data.get(FIELD_TYPE).map(String::as_str) {
            Some(MESSAGE_TYPE_PLAYER_STATE) => Some(InboundEvent::StateUpdate {
                state: data.get(FIELD_PLAYBACK_STATE).cloned(),
                title: data.get(FIELD_TITLE).cloned(),
                artist: data.get(FIELD_ARTIST).cloned(),
            }),
            Some(MESSAGE_TYPE_PING) => Some(InboundEvent::Keepalive),
            other => {
                log::debug!("[dispatch] dropping message with type {:?}", other);
                None
            }
        }
    }

    /// Returns whether an event was forwarded to the controller.
    pub async fn dispatch(handle: &ControllerHandle, data: &HashMap<String, String>) -> bool {
        match Self::decode(data) {
            Some(event) => {
                handle.dispatch(event).await;
                true
            }
            None => false,
        }
    }

    /// Accepts the raw data map as a JSON object of string values.
    pub async fn dispatch_json(handle: &ControllerHandle, raw: &str) -> AppResult<bool> {
        let data: HashMap<String, String> = serde_json::from_str(raw)?;
        Ok(Self::dispatch(handle, &data).await)
    }
}
