//! Best-effort outgoing email.
//!
//! Handlers enqueue through [`Mailer`]; the mail worker drains the queue.
//! Enqueueing never blocks a request and never fails it.

pub mod templates;

use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: String) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html,
        }
    }
}

/// Cloneable handle onto the mail queue
#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::Sender<OutgoingEmail>,
}

impl Mailer {
    /// Create the handle and the receiving end consumed by the mail worker
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutgoingEmail>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queue an email. Returns false when it was dropped (queue full or closed).
    pub fn send(&self, email: OutgoingEmail) -> bool {
        let subject = email.subject.clone();
        match self.tx.try_send(email) {
            Ok(()) => {
                debug!("Queued email: {}", subject);
                true
            }
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!("Mail queue full, dropping email to {}: {}", dropped.to, dropped.subject);
                false
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                warn!("Mail queue closed, dropping email to {}: {}", dropped.to, dropped.subject);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queues_until_full() {
        let (mailer, mut rx) = Mailer::channel(1);
        assert!(mailer.send(OutgoingEmail::new("a@example.com", "one", "<p>1</p>".into())));
        assert!(!mailer.send(OutgoingEmail::new("b@example.com", "two", "<p>2</p>".into())));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.subject, "one");
    }

    #[test]
    fn closed_queue_drops() {
        let (mailer, rx) = Mailer::channel(4);
        drop(rx);
        assert!(!mailer.send(OutgoingEmail::new("a@example.com", "one", String::new())));
    }
}
