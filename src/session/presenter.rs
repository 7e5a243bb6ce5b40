//! Foreground notification rendering.
//!
//! The view is always derived from scratch from `(state, metadata)`; nothing is
//! cached between renders.

use crate::events::{KeyCode, PlaybackState, TrackMetadata};
use crate::keys;
use serde::Serialize;

pub const ICON_PREVIOUS: &str = "ic_media_previous";
pub const ICON_PLAY: &str = "ic_media_play";
pub const ICON_PAUSE: &str = "ic_media_pause";
pub const ICON_NEXT: &str = "ic_media_next";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresentationAction {
    pub label: &'static str,
    pub icon: &'static str,
    pub action_id: &'static str,
    /// Key the control re-enters the controller as when activated.
    pub key: KeyCode,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresentationView {
    pub title: String,
    pub artist: String,
    pub state: PlaybackState,
    pub is_playing: bool,
    pub actions: [PresentationAction; 3],
    pub compact_actions: [usize; 3],
}

fn action(label: &'static str, icon: &'static str, key: KeyCode) -> PresentationAction {
    PresentationAction {
        label,
        icon,
        action_id: keys::action_id(key),
        key,
    }
}

pub fn render(state: PlaybackState, metadata: &TrackMetadata) -> PresentationView {
    let is_playing = state.is_playing();
    let play_pause = if is_playing {
        action("Pause", ICON_PAUSE, KeyCode::Pause)
    } else {
        action("Play", ICON_PLAY, KeyCode::Play)
    };

    PresentationView {
        title: metadata.title.clone(),
        artist: metadata.artist.clone(),
        state,
        is_playing,
        actions: [
            action("Previous", ICON_PREVIOUS, KeyCode::Previous),
            play_pause,
            action("Next", ICON_NEXT, KeyCode::Next),
        ],
        compact_actions: [0, 1, 2],
    }
}

/// Host surface that displays the foreground notification.
pub trait NotificationSurface: Send + Sync {
    fn register_channel(&self, _channel_id: &str, _channel_name: &str) {}
    fn publish(&self, view: &PresentationView);
    fn clear(&self);
}

/// Surface used by the command-line host: writes each view to the log.
pub struct LogSurface;

impl NotificationSurface for LogSurface {
    fn register_channel(&self, channel_id: &str, channel_name: &str) {
        log::info!("[notification] channel {} ({})", channel_id, channel_name);
    }

    fn publish(&self, view: &PresentationView) {
        let controls: Vec<&str> = view.actions.iter().map(|a| a.label).collect();
        log::info!(
            "[notification] {} - {} [{:?}] controls: {}",
            view.artist,
            view.title,
            view.state,
            controls.join(" | ")
        );
    }

    fn clear(&self) {
        log::info!("[notification] cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str, artist: &str) -> TrackMetadata {
        TrackMetadata {
            title: title.into(),
            artist: artist.into(),
        }
    }

    #[test]
    fn playing_shows_pause_control() {
        let view = render(PlaybackState::Playing, &meta("A", "B"));
        assert_eq!(view.title, "A");
        assert_eq!(view.artist, "B");
        assert!(view.is_playing);
        assert_eq!(view.actions[1].label, "Pause");
        assert_eq!(view.actions[1].icon, ICON_PAUSE);
        assert_eq!(view.actions[1].key, KeyCode::Pause);
    }

    #[test]
    fn every_other_state_shows_play_control() {
        for state in [
            PlaybackState::Connecting,
            PlaybackState::Paused,
            PlaybackState::Stopped,
            PlaybackState::Error,
        ] {
            let view = render(state, &meta("-", "-"));
            assert!(!view.is_playing);
            assert_eq!(view.actions[1].key, KeyCode::Play, "{state:?}");
            assert_eq!(view.actions[1].action_id, keys::ACTION_PLAY);
        }
    }

    #[test]
    fn controls_are_previous_toggle_next() {
        let view = render(PlaybackState::Paused, &meta("x", "y"));
        let keys: Vec<KeyCode> = view.actions.iter().map(|a| a.key).collect();
        assert_eq!(keys, vec![KeyCode::Previous, KeyCode::Play, KeyCode::Next]);
        assert_eq!(view.compact_actions, [0, 1, 2]);
    }

    #[test]
    fn render_is_deterministic() {
        let m = meta("Song", "Band");
        assert_eq!(
            render(PlaybackState::Playing, &m),
            render(PlaybackState::Playing, &m)
        );
        assert_ne!(
            render(PlaybackState::Playing, &m),
            render(PlaybackState::Paused, &m)
        );
    }
}
