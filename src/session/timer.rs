use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

/// Stand-in deadline for timeouts too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Delivered into the controller queue when a deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub session_id: Uuid,
    pub generation: u64,
}

/// Cancel-and-reschedule deadline. At most one pending task exists; each `rearm`
/// aborts the previous one and schedules a new fire at `last_activity + timeout`.
pub struct SelfStopTimer {
    timeout: Duration,
    session_id: Uuid,
    generation: u64,
    deadline: Option<Instant>,
    pending: Option<JoinHandle<()>>,
}

impl SelfStopTimer {
    pub fn new(session_id: Uuid, timeout: Duration) -> Self {
        Self {
            timeout,
            session_id,
            generation: 0,
            deadline: None,
            pending: None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn rearm<M>(&mut self, last_activity: Instant, queue: mpsc::WeakSender<M>)
    where
        M: From<TimerFired> + Send + 'static,
    {
        self.cancel();
        self.generation += 1;

        let deadline = last_activity
            .checked_add(self.timeout)
            .unwrap_or_else(|| last_activity + FAR_FUTURE);
        let fired = TimerFired {
            session_id: self.session_id,
            generation: self.generation,
        };
        self.deadline = Some(deadline);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(queue) = queue.upgrade() {
                let _ = queue.send(M::from(fired)).await;
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.deadline = None;
    }

    /// A fire that raced with a rearm or cancel carries a stale key and must be ignored.
    pub fn is_current(&self, fired: &TimerFired) -> bool {
        self.deadline.is_some()
            && fired.session_id == self.session_id
            && fired.generation == self.generation
    }
}

impl Drop for SelfStopTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
