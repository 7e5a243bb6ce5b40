//! The session controller.
//!
//! One tokio task owns the [`PlaybackSession`] and drains a single queue of inbound
//! events, snapshot queries, teardown requests and self-stop fires, strictly in
//! arrival order. Hosts talk to it through a cloneable [`ControllerHandle`].

use crate::config::ControllerConfig;
use crate::error::{AppError, AppResult};
use crate::events::{InboundEvent, KeyCode, PlaybackState, TrackMetadata};
use crate::push::upstream::{CommandKind, UpstreamSender};
use crate::session::grant::{ForegroundGrant, ForegroundHost};
use crate::session::presenter::{self, NotificationSurface};
use crate::session::state::PlaybackSession;
use crate::session::timer::{SelfStopTimer, TimerFired};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

const QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No activity for the configured timeout.
    SelfStop,
    /// The host asked for teardown.
    Teardown,
    /// Every handle was dropped.
    HostGone,
}

enum ControllerMsg {
    Event(InboundEvent),
    Snapshot(oneshot::Sender<PlaybackSession>),
    Teardown,
    TimerFired(TimerFired),
}

impl From<TimerFired> for ControllerMsg {
    fn from(fired: TimerFired) -> Self {
        ControllerMsg::TimerFired(fired)
    }
}

/// Local keys never touch the state; they only pick the command to send upstream.
pub fn command_for(code: KeyCode, state: PlaybackState) -> CommandKind {
    match code {
        KeyCode::Play => CommandKind::Play,
        KeyCode::Pause => CommandKind::Pause,
        KeyCode::Next => CommandKind::Next,
        KeyCode::Previous => CommandKind::Previous,
        KeyCode::PlayPauseToggle => {
            if state.is_playing() {
                CommandKind::Pause
            } else {
                CommandKind::Play
            }
        }
    }
}

#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<ControllerMsg>,
    stopped: watch::Receiver<Option<StopReason>>,
}

impl ControllerHandle {
    /// Events sent after the controller stopped are dropped.
    pub async fn dispatch(&self, event: InboundEvent) {
        let label = event.label();
        if self.tx.send(ControllerMsg::Event(event)).await.is_err() {
            log::debug!("[controller] session closed, dropping {}", label);
        }
    }

    pub async fn press(&self, code: KeyCode) {
        self.dispatch(InboundEvent::LocalKey { code }).await;
    }

    /// Fails with [`AppError::SessionClosed`] once the controller has stopped.
    pub async fn snapshot(&self) -> AppResult<PlaybackSession> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ControllerMsg::Snapshot(reply))
            .await
            .map_err(|_| AppError::SessionClosed)?;
        rx.await.map_err(|_| AppError::SessionClosed)
    }

    pub async fn teardown(&self) -> StopReason {
        if self.tx.send(ControllerMsg::Teardown).await.is_err() {
            log::debug!("[controller] teardown after stop ignored");
        }
        self.stopped().await
    }

    pub async fn stopped(&self) -> StopReason {
        let mut stopped = self.stopped.clone();
        if stopped.wait_for(Option::is_some).await.is_err() {
            log::debug!("[controller] exited without reporting a stop reason");
        }
        let reason = *stopped.borrow();
        reason.unwrap_or(StopReason::HostGone)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.borrow().is_some()
    }
}

pub struct SessionController {
    config: ControllerConfig,
    session: Option<PlaybackSession>,
    sender: UpstreamSender,
    surface: Arc<dyn NotificationSurface>,
    grant: ForegroundGrant,
    timer: SelfStopTimer,
    queue: mpsc::WeakSender<ControllerMsg>,
    stopped: watch::Sender<Option<StopReason>>,
}

impl SessionController {
    /// Creates the session, takes the foreground grant, publishes the initial view and
    /// spawns the event loop. Must be called from within a tokio runtime.
    pub fn start(
        config: ControllerConfig,
        sender: UpstreamSender,
        surface: Arc<dyn NotificationSurface>,
        host: Arc<dyn ForegroundHost>,
    ) -> ControllerHandle {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let (stopped_tx, stopped_rx) = watch::channel(None);

        let session = PlaybackSession::new(TrackMetadata {
            title: config.placeholder_title.clone(),
            artist: config.placeholder_artist.clone(),
        });
        let timer = SelfStopTimer::new(session.id, config.self_stop_timeout);

        let mut controller = SessionController {
            config,
            session: Some(session),
            sender,
            surface,
            grant: ForegroundGrant::new(host),
            timer,
            queue: tx.downgrade(),
            stopped: stopped_tx,
        };
        controller.open();
        tokio::spawn(controller.run(rx));

        ControllerHandle {
            tx,
            stopped: stopped_rx,
        }
    }

    fn open(&mut self) {
        self.grant.acquire();
        self.surface
            .register_channel(&self.config.channel_id, &self.config.channel_name);
        self.publish();
        if let Some(session) = &self.session {
            self.timer.rearm(session.last_activity, self.queue.clone());
            log::info!(
                "[controller] session {} started, self-stop after {:?} idle",
                session.id,
                self.config.self_stop_timeout
            );
        }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<ControllerMsg>) {
        let reason = loop {
            match rx.recv().await {
                Some(ControllerMsg::Event(event)) => self.handle_event(event),
                Some(ControllerMsg::Snapshot(reply)) => {
                    if let Some(session) = &self.session {
                        let _ = reply.send(session.clone());
                    }
                }
                Some(ControllerMsg::TimerFired(fired)) => {
                    if self.timer.is_current(&fired) {
                        break StopReason::SelfStop;
                    }
                    log::debug!(
                        "[controller] ignoring stale self-stop (generation {})",
                        fired.generation
                    );
                }
                Some(ControllerMsg::Teardown) => break StopReason::Teardown,
                None => break StopReason::HostGone,
            }
        };
        self.terminate(reason);
    }

    fn handle_event(&mut self, event: InboundEvent) {
        let Some(session) = self.session.as_mut() else {
            log::debug!("[controller] no session, dropping {}", event.label());
            return;
        };
        log::debug!("[controller] {} received", event.label());

        let at = session.touch();
        self.timer.rearm(at, self.queue.clone());

        match event {
            InboundEvent::StateUpdate {
                state,
                title,
                artist,
            } => {
                let previous = session.state;
                let outcome =
                    session.apply_update(state.as_deref(), title.as_deref(), artist.as_deref());
                if outcome.state_applied {
                    log::info!(
                        "[controller] state {:?} -> {:?} (remote {:?})",
                        previous,
                        session.state,
                        state.as_deref().unwrap_or_default()
                    );
                }
                if outcome.any() {
                    self.publish();
                }
            }
            InboundEvent::Keepalive => {
                log::debug!("[controller] keepalive, deadline reset");
            }
            InboundEvent::LocalKey { code } => {
                let kind = command_for(code, session.state);
                log::info!("[controller] key {:?} -> {}", code, kind.as_str());
                self.sender.send(kind);
            }
        }
    }

    fn publish(&self) {
        if let Some(session) = &self.session {
            let view = presenter::render(session.state, &session.metadata);
            self.surface.publish(&view);
        }
    }

    fn terminate(&mut self, reason: StopReason) {
        self.timer.cancel();
        if let Some(mut session) = self.session.take() {
            session.close();
            self.surface.clear();
            log::info!("[controller] session {} stopped: {:?}", session.id, reason);
        }
        self.grant.release();
        self.stopped.send_replace(Some(reason));
    }
}
