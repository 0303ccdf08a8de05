use crate::error::MailError;
use serde::{Deserialize, Serialize};

#[cfg(feature = "web")]
use crate::config::SmtpConfig;
#[cfg(feature = "web")]
use lettre::message::Mailbox;
#[cfg(feature = "web")]
use lettre::transport::smtp::authentication::Credentials;
#[cfg(feature = "web")]
use lettre::transport::smtp::client::{Tls, TlsParameters};
#[cfg(feature = "web")]
use lettre::{Message, SmtpTransport, Transport};

/// A message submitted through the contact form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    /// All fields are required; the sender address must look like one
    pub fn validate(&self) -> Result<(), MailError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(MailError::MissingField(*field));
        }

        let email = self.email.trim();
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid || email.contains(char::is_whitespace) {
            return Err(MailError::InvalidAddress(email.to_string()));
        }

        Ok(())
    }

    pub fn trimmed(&self) -> ContactMessage {
        ContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Something that can deliver contact messages
pub trait ContactRelay: Send + Sync {
    fn send(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Relay used when no SMTP settings are present
pub struct DisabledRelay;

impl ContactRelay for DisabledRelay {
    fn send(&self, _message: &ContactMessage) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

/// Delivers contact messages through an SMTP server over TLS
#[cfg(feature = "web")]
pub struct Mailer {
    smtp: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

#[cfg(feature = "web")]
impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let tls_parameters = TlsParameters::new(config.host.clone())
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let mut builder = SmtpTransport::relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .tls(Tls::Wrapper(tls_parameters));
        if let (Some(user), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|_| MailError::InvalidAddress(config.from.clone()))?;
        let to = config
            .to
            .parse::<Mailbox>()
            .map_err(|_| MailError::InvalidAddress(config.to.clone()))?;

        Ok(Mailer {
            smtp: builder.build(),
            from,
            to,
        })
    }

    fn build_message(&self, message: &ContactMessage) -> Result<Message, MailError> {
        let reply_to = format!("{} <{}>", message.name, message.email)
            .parse::<Mailbox>()
            .or_else(|_| message.email.parse::<Mailbox>())
            .map_err(|_| MailError::InvalidAddress(message.email.clone()))?;

        Message::builder()
            .from(self.from.clone())
            .reply_to(reply_to)
            .to(self.to.clone())
            .subject(format!("[Contact] {}", message.subject))
            .body(format!(
                "From: {} <{}>\n\n{}",
                message.name, message.email, message.message
            ))
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

#[cfg(feature = "web")]
impl ContactRelay for Mailer {
    fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        let email = self.build_message(message)?;
        self.smtp
            .send(&email)
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}
