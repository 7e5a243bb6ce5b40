use crate::config::UpstreamConfig;
use crate::push::transport::{PushTransport, UpstreamData, UpstreamMessage};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const CORRELATION_ID_LEN: usize = 20;
const CORRELATION_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandKind {
    Play,
    Pause,
    Next,
    Previous,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Play => "PLAY",
            CommandKind::Pause => "PAUSE",
            CommandKind::Next => "NEXT",
            CommandKind::Previous => "PREVIOUS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCommand {
    pub kind: CommandKind,
    pub correlation_id: String,
    pub ttl: Duration,
}

impl UpstreamCommand {
    pub fn new(kind: CommandKind, ttl: Duration) -> Self {
        Self {
            kind,
            correlation_id: correlation_id(),
            ttl,
        }
    }

    pub fn to_message(&self, recipient: &str) -> UpstreamMessage {
        UpstreamMessage {
            to: recipient.to_string(),
            message_id: self.correlation_id.clone(),
            time_to_live: self.ttl.as_secs() as u32,
            data: UpstreamData {
                media_command: self.kind.as_str().to_string(),
            },
        }
    }
}

/// Random id drawn uniformly from `[0-9a-z]`.
pub fn correlation_id() -> String {
    let mut rng = rand::thread_rng();
    (0..CORRELATION_ID_LEN)
        .map(|_| CORRELATION_ALPHABET[rng.gen_range(0..CORRELATION_ALPHABET.len())] as char)
        .collect()
}

/// Best-effort sender. Transmission runs on its own task and its outcome is only logged.
#[derive(Clone)]
pub struct UpstreamSender {
    recipient: String,
    ttl: Duration,
    transport: Arc<dyn PushTransport>,
}

impl UpstreamSender {
    pub fn new(config: &UpstreamConfig, transport: Arc<dyn PushTransport>) -> Self {
        Self {
            recipient: config.recipient.clone(),
            ttl: Duration::from_secs(config.ttl_secs as u64),
            transport,
        }
    }

    pub fn send(&self, kind: CommandKind) -> UpstreamCommand {
        let command = UpstreamCommand::new(kind, self.ttl);
        let message = command.to_message(&self.recipient);
        log::info!(
            "[upstream] sending {} to {} (message id {})",
            kind.as_str(),
            self.recipient,
            command.correlation_id
        );

        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            match transport.send(&message).await {
                Ok(()) => log::debug!("[upstream] message sent: {}", message.message_id),
                Err(e) => log::warn!(
                    "[upstream] send failed for {} ({}): {}",
                    message.message_id,
                    e.kind(),
                    e
                ),
            }
        });

        command
    }
}
