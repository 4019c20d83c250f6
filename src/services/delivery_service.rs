use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Body, Mailbox};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::response::{Code, Severity};
use lettre::Message;

use crate::config::MailConfig;
use crate::domain::{DeliveryOutcome, RecipientList};
use crate::errors::{PushError, PushResult};
use crate::services::format_service::ContentFormatter;

/// One authenticated mail submission session.
#[cfg_attr(test, mockall::automock)]
pub trait MailSession {
    /// Authenticate. A rejected login is `PushError::Authentication`.
    fn login(&mut self, username: &str, password: &str) -> PushResult<()>;
    fn send(&mut self, message: &Message) -> PushResult<()>;
    fn quit(&mut self) -> PushResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait MailTransport {
    fn connect(&self) -> PushResult<Box<dyn MailSession>>;
}

/// Implicit-TLS SMTP submission (port 465 style).
pub struct SmtpMailTransport {
    host: String,
    port: u16,
    timeout: std::time::Duration,
}

impl SmtpMailTransport {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            timeout: config.timeout,
        }
    }
}

impl MailTransport for SmtpMailTransport {
    fn connect(&self) -> PushResult<Box<dyn MailSession>> {
        let tls = TlsParameters::new(self.host.clone())?;
        let connection = SmtpConnection::connect(
            (self.host.as_str(), self.port),
            Some(self.timeout),
            &ClientId::default(),
            Some(&tls),
            None,
        )?;

        tracing::debug!(host = %self.host, port = self.port, "SMTP connection established");
        Ok(Box::new(SmtpSession { connection }))
    }
}

struct SmtpSession {
    connection: SmtpConnection,
}

impl MailSession for SmtpSession {
    fn login(&mut self, username: &str, password: &str) -> PushResult<()> {
        let credentials = Credentials::new(username.to_string(), password.to_string());
        match self
            .connection
            .auth(&[Mechanism::Plain, Mechanism::Login], &credentials)
        {
            Ok(_) => Ok(()),
            Err(e) if is_credential_rejection(e.status()) => {
                Err(PushError::Authentication(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn send(&mut self, message: &Message) -> PushResult<()> {
        self.connection
            .send(message.envelope(), &message.formatted())?;
        Ok(())
    }

    fn quit(&mut self) -> PushResult<()> {
        self.connection.quit()?;
        Ok(())
    }
}

/// A permanent (5xx) reply to AUTH means the server rejected the credentials.
/// Transient replies and failures without a reply are transport errors.
fn is_credential_rejection(status: Option<Code>) -> bool {
    status.is_some_and(|code| code.severity == Severity::PermanentNegativeCompletion)
}

/// Sends the digest to every configured recipient over a single session.
pub struct DeliveryAgent<T: MailTransport> {
    transport: T,
    config: MailConfig,
}

impl<T: MailTransport> DeliveryAgent<T> {
    pub fn new(transport: T, config: MailConfig) -> Self {
        Self { transport, config }
    }

    /// Deliver `fragment` as one message per recipient.
    ///
    /// Missing configuration and rejected logins are reported as outcomes.
    /// Any other transport failure is logged and returned as an error; messages
    /// already sent before the failure stay sent.
    pub fn send(&self, fragment: &str) -> PushResult<DeliveryOutcome> {
        let (sender, password, recipients) = match self.validated() {
            Ok(parts) => parts,
            Err(reason) => {
                tracing::warn!("Mail configuration incomplete: {}", reason);
                return Ok(DeliveryOutcome::ConfigError(reason));
            }
        };

        let from = match sender.parse::<lettre::Address>() {
            Ok(address) => Mailbox::new(Some(self.config.sender_name.clone()), address),
            Err(e) => {
                let reason = format!("invalid sender address {}: {}", sender, e);
                tracing::warn!("Mail configuration incomplete: {}", reason);
                return Ok(DeliveryOutcome::ConfigError(reason));
            }
        };

        let body = ContentFormatter::document(fragment);

        match self.deliver(&from, sender, password, &recipients, &body) {
            Err(PushError::Authentication(reason)) => {
                tracing::error!(
                    "SMTP login rejected, check the sender address, app password and two-step verification: {}",
                    reason
                );
                Ok(DeliveryOutcome::AuthFailed(reason))
            }
            Err(e) => {
                tracing::error!(error = %e, "Mail delivery failed");
                Err(e)
            }
            Ok(sent) => {
                tracing::info!(sent, "All messages delivered");
                Ok(DeliveryOutcome::Delivered { sent })
            }
        }
    }

    fn validated(&self) -> Result<(&str, &str, RecipientList), String> {
        let is_set = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        if !is_set(&self.config.sender) {
            missing.push("GMAIL_EMAIL");
        }
        if !is_set(&self.config.password) {
            missing.push("GMAIL_APP_PASSWORD");
        }
        if !is_set(&self.config.recipients) {
            missing.push("RECEIVER_EMAILS");
        }
        if !missing.is_empty() {
            return Err(format!("missing {}", missing.join(", ")));
        }

        let recipients = RecipientList::parse(self.config.recipients.as_deref().unwrap_or_default());
        if recipients.is_empty() {
            return Err("RECEIVER_EMAILS contains no addresses".to_string());
        }

        Ok((
            self.config.sender.as_deref().unwrap_or_default().trim(),
            self.config.password.as_deref().unwrap_or_default(),
            recipients,
        ))
    }

    fn deliver(
        &self,
        from: &Mailbox,
        username: &str,
        password: &str,
        recipients: &RecipientList,
        body: &str,
    ) -> PushResult<usize> {
        let mut session = self.transport.connect()?;
        session.login(username, password)?;
        tracing::info!(recipients = recipients.len(), "Connected to mail server");

        // Base64 keeps the UTF-8 HTML intact regardless of server 8BITMIME support
        let body = Body::new_with_encoding(body.to_string(), ContentTransferEncoding::Base64)
            .map_err(|_| PushError::Delivery("could not encode message body".to_string()))?;

        let mut sent = 0;
        for recipient in recipients.iter() {
            let to: Mailbox = recipient.parse()?;
            let message = Message::builder()
                .from(from.clone())
                .to(to)
                .subject(self.config.subject.as_str())
                .header(ContentType::TEXT_HTML)
                .body(body.clone())?;

            session.send(&message)?;
            sent += 1;
            tracing::info!(recipient, "Message sent");
        }

        session.quit()?;
        Ok(sent)
    }
}
