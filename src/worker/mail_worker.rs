use std::sync::Arc;

use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tokio::sync::{mpsc, watch, Semaphore};
use tracing::{error, info, warn};

use crate::config::SmtpConfig;
use crate::mail::OutgoingEmail;

/// Background worker delivering queued email
///
/// Without SMTP settings every email is logged instead of sent, which keeps
/// local development free of a mail relay.
pub struct MailWorker {
    transport: Option<(SmtpTransport, Mailbox)>,
    concurrency: usize,
}

impl MailWorker {
    pub fn new(smtp: Option<&SmtpConfig>, concurrency: usize) -> Result<Self, String> {
        let transport = match smtp {
            Some(smtp) => Some(build_transport(smtp)?),
            None => None,
        };
        Ok(Self {
            transport,
            concurrency: concurrency.max(1),
        })
    }

    /// Run until shutdown is signalled or every `Mailer` is dropped
    ///
    /// # Concurrency Model
    /// - One loop pulls emails off the queue
    /// - Each send runs on the blocking pool while holding a semaphore permit
    /// - On shutdown the queue is closed, whatever is still buffered is sent,
    ///   and the worker waits for every in-flight send to finish
    pub async fn run(
        self,
        mut rx: mpsc::Receiver<OutgoingEmail>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        info!(
            "Mail worker started (concurrency={}, smtp={})",
            self.concurrency,
            self.transport.is_some()
        );

        loop {
            tokio::select! {
                maybe_email = rx.recv() => match maybe_email {
                    Some(email) => self.dispatch(email, &semaphore).await,
                    None => break,
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Mail worker received shutdown signal");
                        break;
                    }
                }
            }
        }

        rx.close();
        while let Some(email) = rx.recv().await {
            self.dispatch(email, &semaphore).await;
        }

        // All permits back means no send is still running
        let drained = semaphore.acquire_many(self.concurrency as u32).await;
        match drained {
            Ok(_) => info!("Mail worker drained"),
            Err(e) => error!("Mail worker failed to drain: {:?}", e),
        }
    }

    async fn dispatch(&self, email: OutgoingEmail, semaphore: &Arc<Semaphore>) {
        let Some((transport, from)) = self.transport.clone() else {
            info!(
                "Email would be sent (SMTP not configured): to={} subject={}",
                email.to, email.subject
            );
            return;
        };

        let message = match build_message(from, &email) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping email to {}: {}", email.to, e);
                return;
            }
        };

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("Mail worker failed to acquire semaphore: {:?}", e);
                return;
            }
        };

        tokio::spawn(async move {
            let to = email.to;
            let result = tokio::task::spawn_blocking(move || transport.send(&message)).await;
            match result {
                Ok(Ok(_)) => info!("Email sent to {}: {}", to, email.subject),
                Ok(Err(e)) => error!("Could not send email to {}: {:?}", to, e),
                Err(e) => error!("Mail task failed to execute: {:?}", e),
            }
            drop(permit);
        });
    }
}

fn build_transport(smtp: &SmtpConfig) -> Result<(SmtpTransport, Mailbox), String> {
    let builder = if smtp.secure {
        SmtpTransport::relay(&smtp.host)
    } else {
        SmtpTransport::starttls_relay(&smtp.host)
    }
    .map_err(|e| format!("invalid SMTP relay {}: {}", smtp.host, e))?;

    let transport = builder
        .port(smtp.port)
        .credentials(Credentials::new(smtp.username.clone(), smtp.password.clone()))
        .build();

    let from: Mailbox = smtp
        .from
        .parse()
        .map_err(|e| format!("invalid EMAIL_FROM {}: {}", smtp.from, e))?;

    Ok((transport, from))
}

fn build_message(from: Mailbox, email: &OutgoingEmail) -> Result<Message, String> {
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| format!("invalid recipient: {}", e))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())
        .map_err(|e| format!("invalid message: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::Mailer;

    #[test]
    fn builds_html_message() {
        let from: Mailbox = "JobPortal <jobs@example.com>".parse().unwrap();
        let email = OutgoingEmail::new("seeker@example.com", "Payment Confirmed", "<h1>ok</h1>".into());
        let message = build_message(from, &email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Payment Confirmed"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn rejects_bad_recipient() {
        let from: Mailbox = "jobs@example.com".parse().unwrap();
        let email = OutgoingEmail::new("not an address", "x", String::new());
        assert!(build_message(from, &email).is_err());
    }

    #[tokio::test]
    async fn drains_queue_on_shutdown() {
        let worker = MailWorker::new(None, 2).unwrap();
        let (mailer, rx) = Mailer::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        assert!(mailer.send(OutgoingEmail::new("a@example.com", "one", String::new())));
        assert!(mailer.send(OutgoingEmail::new("b@example.com", "two", String::new())));

        let handle = tokio::spawn(worker.run(rx, shutdown_rx));
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        // Queue is closed once the worker has stopped
        assert!(!mailer.send(OutgoingEmail::new("c@example.com", "three", String::new())));
    }
}
