//! Recording fakes shared by the unit tests.

use crate::error::{AppError, AppResult};
use crate::push::transport::{PushTransport, UpstreamMessage};
use crate::session::grant::ForegroundHost;
use crate::session::presenter::{NotificationSurface, PresentationView};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub struct RecordingTransport {
    sent: mpsc::UnboundedSender<UpstreamMessage>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UpstreamMessage>) {
        let (sent, rx) = mpsc::unbounded_channel();
        (Self { sent, fail: false }, rx)
    }

    pub fn failing() -> (Self, mpsc::UnboundedReceiver<UpstreamMessage>) {
        let (sent, rx) = mpsc::unbounded_channel();
        (Self { sent, fail: true }, rx)
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn send(&self, message: &UpstreamMessage) -> AppResult<()> {
        let _ = self.sent.send(message.clone());
        if self.fail {
            return Err(AppError::Push {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    views: Mutex<Vec<PresentationView>>,
    channels: Mutex<Vec<String>>,
    clears: AtomicUsize,
}

impl RecordingSurface {
    pub fn last(&self) -> Option<PresentationView> {
        self.views.lock().unwrap().last().cloned()
    }

    pub fn publish_count(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn channels(&self) -> Vec<String> {
        self.channels.lock().unwrap().clone()
    }
}

impl NotificationSurface for RecordingSurface {
    fn register_channel(&self, channel_id: &str, _channel_name: &str) {
        self.channels.lock().unwrap().push(channel_id.to_string());
    }

    fn publish(&self, view: &PresentationView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct CountingHost {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl CountingHost {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ForegroundHost for CountingHost {
    fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
