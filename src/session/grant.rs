use std::sync::Arc;

/// Keeps the hosting process in the foreground while a session is live.
pub trait ForegroundHost: Send + Sync {
    fn acquire(&self);
    fn release(&self);
}

/// Host used by the command-line runner. The process stays alive for as long as
/// `run` awaits the controller, so this only records the transitions.
pub struct LogHost;

impl ForegroundHost for LogHost {
    fn acquire(&self) {
        log::info!("[foreground] acquired");
    }

    fn release(&self) {
        log::info!("[foreground] released");
    }
}

/// Scoped grant over a [`ForegroundHost`]. Acquire and release are both idempotent,
/// and a grant still held on drop is released.
pub struct ForegroundGrant {
    host: Arc<dyn ForegroundHost>,
    held: bool,
}

impl ForegroundGrant {
    pub fn new(host: Arc<dyn ForegroundHost>) -> Self {
        Self { host, held: false }
    }

    pub fn acquire(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.host.acquire();
        self.held = true;
        true
    }

    pub fn release(&mut self) -> bool {
        if !self.held {
            return false;
        }
        self.host.release();
        self.held = false;
        true
    }
}

impl Drop for ForegroundGrant {
    fn drop(&mut self) {
        self.release();
    }
}
