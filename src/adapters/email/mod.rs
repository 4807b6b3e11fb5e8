//! Outbound email adapters.

mod smtp;

pub use smtp::{LoggingMailer, SmtpConfig};
