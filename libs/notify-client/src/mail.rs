use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail service answered {0}")]
    UnexpectedStatus(u16),
}

/// Where and how to reach the notifications service's mail endpoint.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub url: String,
    pub key: String,
}

impl MailConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self { url: url.into(), key: key.into() }
    }

    pub fn from_env() -> Result<Self, MailError> {
        let url = std::env::var("NOTIFICATIONS_URL")
            .map_err(|_| MailError::MissingEnv("NOTIFICATIONS_URL"))?;
        let key =
            std::env::var("MAIL_KEY").map_err(|_| MailError::MissingEnv("MAIL_KEY"))?;
        Ok(Self { url, key })
    }
}

/// Delivery of verification PIN mails. A trait so flows can be tested with a
/// recording double instead of a live HTTP endpoint.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_pin(&self, pin: &str, email: &str, name: &str) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct PinMailRequest<'a> {
    pin: &'a str,
    email: &'a str,
    name: &'a str,
}

/// POSTs the PIN payload to the notifications service, authenticated by the
/// shared `Key` header. Anything but 201 Created is a failure.
#[derive(Clone)]
pub struct HttpMailSender {
    http: reqwest::Client,
    config: MailConfig,
}

impl HttpMailSender {
    pub fn new(config: MailConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a caller-built client, e.g. with timeouts or proxy settings.
    pub fn with_client(http: reqwest::Client, config: MailConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send_pin(&self, pin: &str, email: &str, name: &str) -> Result<(), MailError> {
        let response = self
            .http
            .post(&self.config.url)
            .header("Key", &self.config.key)
            .json(&PinMailRequest { pin, email, name })
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 201 {
            tracing::warn!(status, email, "mail service rejected pin mail");
            return Err(MailError::UnexpectedStatus(status));
        }
        Ok(())
    }
}
