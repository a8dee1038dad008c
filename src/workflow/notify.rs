use serde::Serialize;
use tracing::{debug, warn};

use crate::model::Notification;

/// A message the engine wants delivered once its transaction has committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationIntent {
    pub recipient_id: u64,
    pub recipient: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

impl From<sqlx::Error> for NotifyError {
    fn from(value: sqlx::Error) -> Self {
        NotifyError::Transport(value.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, employee_id: u64, message: &str) -> Result<(), NotifyError>;
}

/// Read side of the notification inbox.
#[allow(async_fn_in_trait)]
pub trait Inbox {
    /// Newest first.
    async fn list(&self, employee_id: u64) -> Result<Vec<Notification>, NotifyError>;
    async fn unread_count(&self, employee_id: u64) -> Result<u64, NotifyError>;
    /// Returns how many rows flipped to read.
    async fn mark_all_read(&self, employee_id: u64) -> Result<u64, NotifyError>;
}

/// Best-effort fan-out of intents; failures are logged and dropped.
pub struct NotificationDispatcher<N> {
    notifier: N,
}

impl<N: Notifier> NotificationDispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Returns how many intents were delivered.
    pub async fn dispatch(&self, intents: &[NotificationIntent]) -> usize {
        let mut delivered = 0;
        for intent in intents {
            match self.notifier.notify(intent.recipient_id, &intent.message).await {
                Ok(()) => {
                    delivered += 1;
                    debug!(recipient = %intent.recipient, "notification delivered");
                }
                Err(e) => {
                    warn!(error = %e, recipient = %intent.recipient, "notification dropped");
                }
            }
        }
        delivered
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
