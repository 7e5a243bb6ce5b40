use serde::Serialize;

pub const MESSAGE_TYPE_PLAYER_STATE: &str = "player_state";
pub const MESSAGE_TYPE_PING: &str = "ping";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Connecting,
    Playing,
    Paused,
    Stopped,
    Error,
}

impl PlaybackState {
    /// Maps the remote `playbackState` string. Anything unrecognized is `Error`.
    pub fn from_remote(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "playing" => PlaybackState::Playing,
            "paused" => PlaybackState::Paused,
            "stopped" => PlaybackState::Stopped,
            _ => PlaybackState::Error,
        }
    }

    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Play,
    Pause,
    Next,
    Previous,
    PlayPauseToggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    StateUpdate {
        state: Option<String>,
        title: Option<String>,
        artist: Option<String>,
    },
    Keepalive,
    LocalKey {
        code: KeyCode,
    },
}

impl InboundEvent {
    pub fn state(state: impl Into<String>) -> Self {
        InboundEvent::StateUpdate {
            state: Some(state.into()),
            title: None,
            artist: None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InboundEvent::StateUpdate { .. } => "state_update",
            InboundEvent::Keepalive => "keepalive",
            InboundEvent::LocalKey { .. } => "local_key",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_states_map_in_any_case() {
        for (raw, expected) in [
            ("playing", PlaybackState::Playing),
            ("PLAYING", PlaybackState::Playing),
            ("Paused", PlaybackState::Paused),
            ("sToPpEd", PlaybackState::Stopped),
        ] {
            let state = PlaybackState::from_remote(raw);
            assert_eq!(state, expected, "{raw}");
            assert_eq!(state.is_playing(), raw.eq_ignore_ascii_case("playing"));
        }
    }

    #[test]
    fn anything_else_is_error() {
        for raw in ["", "bogus", "play", "playing ", "connecting", "error", "\u{0}"] {
            assert_eq!(PlaybackState::from_remote(raw), PlaybackState::Error, "{raw:?}");
        }
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&PlaybackState::Connecting).unwrap();
        assert_eq!(json, "\"connecting\"");
    }
}
