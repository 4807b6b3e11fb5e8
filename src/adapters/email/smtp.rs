//! Email delivery.
//!
//! Deployments without an SMTP relay run the logging mailer, which records
//! the full message at info level instead of transmitting it. The reset
//! flow only needs delivery to be observable in development.

use async_trait::async_trait;

use crate::domain::ApiError;
use crate::ports::Mailer;

/// Sender identity stamped on outbound messages.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub from_name: String,
    pub from_email: String,
}

/// Mailer that writes messages to the log instead of a wire.
pub struct LoggingMailer {
    config: SmtpConfig,
}

impl LoggingMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ApiError> {
        tracing::info!(
            from = %format!("{} <{}>", self.config.from_name, self.config.from_email),
            to = %to,
            subject = %subject,
            body = %body,
            "outbound email"
        );
        Ok(())
    }
}
