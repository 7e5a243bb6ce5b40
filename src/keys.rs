use crate::events::{InboundEvent, KeyCode};

/// Media key names accepted from local input.
pub const MEDIA_KEY_PLAY: &str = "media-key:play";
pub const MEDIA_KEY_PAUSE: &str = "media-key:pause";
pub const MEDIA_KEY_TOGGLE_PLAY: &str = "media-key:toggle-play";
pub const MEDIA_KEY_NEXT: &str = "media-key:next";
pub const MEDIA_KEY_PREVIOUS: &str = "media-key:previous";

/// Action ids carried by the notification controls.
pub const ACTION_PLAY: &str = "action_play";
pub const ACTION_PAUSE: &str = "action_pause";
pub const ACTION_NEXT: &str = "action_next";
pub const ACTION_PREVIOUS: &str = "action_previous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn down(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Down,
        }
    }

    /// Only key-down produces an event; the matching key-up is swallowed.
    pub fn into_event(self) -> Option<InboundEvent> {
        match self.action {
            KeyAction::Down => Some(InboundEvent::LocalKey { code: self.code }),
            KeyAction::Up => None,
        }
    }
}

/// Resolves a media key name, a notification action id, or a bare command word.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let code = match name {
        MEDIA_KEY_PLAY | ACTION_PLAY => KeyCode::Play,
        MEDIA_KEY_PAUSE | ACTION_PAUSE => KeyCode::Pause,
        MEDIA_KEY_TOGGLE_PLAY => KeyCode::PlayPauseToggle,
        MEDIA_KEY_NEXT | ACTION_NEXT => KeyCode::Next,
        MEDIA_KEY_PREVIOUS | ACTION_PREVIOUS => KeyCode::Previous,
        other => match other.to_lowercase().as_str() {
            "play" => KeyCode::Play,
            "pause" => KeyCode::Pause,
            "next" => KeyCode::Next,
            "previous" | "prev" => KeyCode::Previous,
            "toggle" | "play_pause" | "playpause" => KeyCode::PlayPauseToggle,
            _ => return None,
        },
    };
    Some(code)
}

pub fn action_id(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Play => ACTION_PLAY,
        KeyCode::Pause => ACTION_PAUSE,
        KeyCode::Next => ACTION_NEXT,
        KeyCode::Previous => ACTION_PREVIOUS,
        KeyCode::PlayPauseToggle => MEDIA_KEY_TOGGLE_PLAY,
    }
}
