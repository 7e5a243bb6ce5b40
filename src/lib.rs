mod config;
mod error;
mod events;
mod keys;
mod push;
mod session;
#[cfg(test)]
mod testing;

pub use config::{AppConfig, ControllerConfig, UpstreamConfig};
pub use error::{AppError, AppResult};
pub use events::{InboundEvent, KeyCode, PlaybackState, TrackMetadata};
pub use keys::{parse_key, KeyAction, KeyEvent};
pub use push::dispatcher::PushDispatcher;
pub use push::transport::{HttpPushTransport, PushTransport, UpstreamMessage};
pub use push::upstream::{CommandKind, UpstreamCommand, UpstreamSender};
pub use session::controller::{ControllerHandle, SessionController, StopReason};
pub use session::grant::{ForegroundGrant, ForegroundHost, LogHost};
pub use session::presenter::{render, LogSurface, NotificationSurface, PresentationView};
pub use session::state::{PlaybackSession, UpdateOutcome};
pub use session::timer::{SelfStopTimer, TimerFired};

use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs the gateway against stdin: JSON lines are push payloads, anything else is a
/// media key name. Returns once the controller stops.
pub async fn run() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("mediagateway=info"),
    )
    .init();

    let config = AppConfig::load_or_default();

    if config.sender_id.is_empty() {
        log::warn!("No sender_id configured; upstream commands will not reach a sender");
    }

    let upstream_config = config.upstream_config();
    let transport = match HttpPushTransport::new(&upstream_config) {
        Ok(transport) => transport,
        Err(e) => {
            log::error!("Failed to create push transport: {}", e);
            return;
        }
    };
    let sender = UpstreamSender::new(&upstream_config, Arc::new(transport));

    let handle = SessionController::start(
        config.controller_config(),
        sender,
        Arc::new(LogSurface),
        Arc::new(LogHost),
    );

    let mut input = spawn_input_reader();
    let reason = loop {
        tokio::select! {
            reason = handle.stopped() => break reason,
            line = input.recv() => match line {
                Some(line) => {
                    if let Err(e) = handle_line(&handle, &line).await {
                        log::warn!("Ignoring input ({}): {}", e.kind(), e);
                    }
                }
                None => {
                    log::info!("Input closed, tearing down");
                    break handle.teardown().await;
                }
            },
        }
    };

    log::info!("Controller stopped: {:?}", reason);
}

/// Stdin is read on its own thread so a pending read never holds up shutdown.
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        use std::io::BufRead;
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

pub async fn handle_line(handle: &ControllerHandle, line: &str) -> AppResult<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }

    if line.starts_with('{') {
        PushDispatcher::dispatch_json(handle, line).await?;
        return Ok(());
    }

    let code = parse_key(line)
        .ok_or_else(|| AppError::InvalidPayload(format!("unknown key: {}", line)))?;
    if let Some(event) = KeyEvent::down(code).into_event() {
        handle.dispatch(event).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingHost, RecordingSurface, RecordingTransport};

    #[tokio::test]
    async fn input_lines_drive_the_controller() {
        let (transport, mut sent) = RecordingTransport::new();
        let sender = UpstreamSender::new(&UpstreamConfig::default(), Arc::new(transport));
        let surface = Arc::new(RecordingSurface::default());
        let handle = SessionController::start(
            ControllerConfig::default(),
            sender,
            surface.clone(),
            Arc::new(CountingHost::default()),
        );

        handle_line(
            &handle,
            r#"{"type":"player_state","playbackState":"playing","title":"A","artist":"B"}"#,
        )
        .await
        .unwrap();
        handle_line(&handle, "   ").await.unwrap();
        handle_line(&handle, r#"{"type":"unknown"}"#).await.unwrap();
        handle_line(&handle, "media-key:toggle-play").await.unwrap();

        assert_eq!(sent.recv().await.unwrap().data.media_command, "PAUSE");
        let view = surface.last().unwrap();
        assert_eq!(view.title, "A");
        assert!(view.is_playing);

        assert_eq!(
            handle_line(&handle, "rewind").await.unwrap_err().kind(),
            "invalid_payload"
        );
        assert_eq!(
            handle_line(&handle, "{\"type\":").await.unwrap_err().kind(),
            "json"
        );
        handle.teardown().await;
    }
}
