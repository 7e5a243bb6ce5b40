use crate::events::{PlaybackState, TrackMetadata};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSession {
    pub id: Uuid,
    pub state: PlaybackState,
    pub metadata: TrackMetadata,
    pub is_active: bool,
    pub last_activity_at: DateTime<Utc>,
    /// Monotonic twin of `last_activity_at`; the self-stop deadline is measured from it.
    #[serde(skip)]
    pub last_activity: Instant,
}

/// What an update actually touched, so callers know whether to re-render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub state_applied: bool,
    pub metadata_applied: bool,
}

impl UpdateOutcome {
    pub fn any(self) -> bool {
        self.state_applied || self.metadata_applied
    }
}

impl PlaybackSession {
    pub fn new(placeholder: TrackMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: PlaybackState::Connecting,
            metadata: placeholder,
            is_active: true,
            last_activity_at: Utc::now(),
            last_activity: Instant::now(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Stamps both activity clocks together and returns the monotonic one.
    pub fn touch(&mut self) -> Instant {
        self.last_activity_at = Utc::now();
        self.last_activity = Instant::now();
        self.last_activity
    }

    /// State and metadata are independent: metadata is replaced only when both
    /// title and artist are present, and a metadata-only update leaves the state alone.
    pub fn apply_update(
        &mut self,
        state: Option<&str>,
        title: Option<&str>,
        artist: Option<&str>,
    ) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        if let Some(raw) = state {
            self.state = PlaybackState::from_remote(raw);
            outcome.state_applied = true;
        }

        if let (Some(title), Some(artist)) = (title, artist) {
            self.metadata = TrackMetadata {
                title: title.to_string(),
                artist: artist.to_string(),
            };
            outcome.metadata_applied = true;
        }

        outcome
    }

    pub fn close(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder() -> TrackMetadata {
        TrackMetadata {
            title: "-".into(),
            artist: "-".into(),
        }
    }

    #[test]
    fn starts_connecting_with_placeholder() {
        let session = PlaybackSession::new(placeholder());
        assert_eq!(session.state, PlaybackState::Connecting);
        assert_eq!(session.metadata, placeholder());
        assert!(session.is_active);
        assert!(!session.is_playing());
    }

    #[test]
    fn state_only_update_keeps_metadata() {
        let mut session = PlaybackSession::new(placeholder());
        session.apply_update(Some("playing"), Some("A"), Some("B"));

        let outcome = session.apply_update(Some("bogus"), None, None);
        assert!(outcome.state_applied);
        assert!(!outcome.metadata_applied);
        assert_eq!(session.state, PlaybackState::Error);
        assert_eq!(session.metadata.title, "A");
        assert_eq!(session.metadata.artist, "B");
    }

    #[test]
    fn metadata_only_update_keeps_state() {
        let mut session = PlaybackSession::new(placeholder());
        session.apply_update(Some("paused"), None, None);

        let outcome = session.apply_update(None, Some("T"), Some("R"));
        assert_eq!(
            outcome,
            UpdateOutcome {
                state_applied: false,
                metadata_applied: true
            }
        );
        assert_eq!(session.state, PlaybackState::Paused);
        assert_eq!(session.metadata.title, "T");
    }

    #[test]
    fn half_metadata_is_ignored() {
        let mut session = PlaybackSession::new(placeholder());
        let outcome = session.apply_update(None, Some("only title"), None);
        assert!(!outcome.any());
        assert_eq!(session.metadata, placeholder());
        assert_eq!(session.state, PlaybackState::Connecting);
    }

    #[tokio::test(start_paused = true)]
    async fn touch_moves_both_activity_stamps() {
        let mut session = PlaybackSession::new(placeholder());
        let wall_before = session.last_activity_at;
        let mono_before = session.last_activity;

        tokio::time::advance(std::time::Duration::from_secs(30)).await;
        let at = session.touch();

        assert_eq!(at, session.last_activity);
        assert!(at >= mono_before + std::time::Duration::from_secs(30));
        assert!(session.last_activity_at >= wall_before);
    }

    #[test]
    fn close_marks_inactive() {
        let mut session = PlaybackSession::new(placeholder());
        session.close();
        assert!(!session.is_active);
    }
}
