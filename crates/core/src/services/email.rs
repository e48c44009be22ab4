//! Email delivery.
//!
//! Transport only; message content is composed by the notification worker.
//! An unconfigured service is disabled, not an error: sends become no-ops
//! so the submission pipeline never depends on mail settings.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use markethall_common::config::EmailConfig;
use markethall_common::{AppError, AppResult};
use tracing::{debug, info};

const BREVO_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Email provider configuration.
#[derive(Clone)]
enum Provider {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Brevo { api_key: String },
}

/// An outbound email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub text_body: String,
    /// HTML body (optional).
    pub html_body: Option<String>,
}

/// Email service.
#[derive(Clone)]
pub struct EmailService {
    provider: Option<Provider>,
    from_address: String,
    from_name: String,
    http_client: reqwest::Client,
}

impl EmailService {
    /// Build the service from configuration. Missing or incomplete provider
    /// settings disable the service.
    pub fn from_config(config: &EmailConfig) -> AppResult<Self> {
        let provider = if config.enabled {
            match config.provider.as_str() {
                "smtp" => match &config.smtp_host {
                    Some(host) => {
                        let mut builder =
                            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                                .map_err(|e| AppError::Config(e.to_string()))?
                                .port(config.smtp_port);
                        if let (Some(username), Some(password)) =
                            (&config.smtp_username, &config.smtp_password)
                        {
                            builder = builder
                                .credentials(Credentials::new(username.clone(), password.clone()));
                        }
                        Some(Provider::Smtp(builder.build()))
                    }
                    None => None,
                },
                "brevo" => config.brevo_api_key.clone().map(|api_key| Provider::Brevo { api_key }),
                other => {
                    return Err(AppError::Config(format!("Unknown email provider: {other}")));
                }
            }
        } else {
            None
        };

        if provider.is_none() {
            info!("Email delivery disabled");
        }

        Ok(Self {
            provider,
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            http_client: reqwest::Client::new(),
        })
    }

    /// Build a disabled service.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            provider: None,
            from_address: String::new(),
            from_name: String::new(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Whether a provider is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Send an email. A disabled service logs and returns Ok.
    pub async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let Some(provider) = &self.provider else {
            debug!(to = %message.to, subject = %message.subject, "Email disabled, dropping message");
            return Ok(());
        };

        match provider {
            Provider::Smtp(transport) => self.send_smtp(transport, message).await,
            Provider::Brevo { api_key } => self.send_brevo(api_key, message).await,
        }
    }

    async fn send_smtp(
        &self,
        transport: &AsyncSmtpTransport<Tokio1Executor>,
        message: EmailMessage,
    ) -> AppResult<()> {
        let from: Mailbox = format!("{} <{}>", self.from_name, self.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::ExternalService(format!("Invalid recipient address: {e}")))?;

        let builder = Message::builder().from(from).to(to).subject(message.subject);

        let email = match message.html_body {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(message.text_body, html)),
            None => builder.body(message.text_body),
        }
        .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?;

        transport
            .send(email)
            .await
            .map_err(|e| AppError::ExternalService(format!("SMTP send failed: {e}")))?;

        Ok(())
    }

    async fn send_brevo(&self, api_key: &str, message: EmailMessage) -> AppResult<()> {
        let mut body = serde_json::json!({
            "sender": {
                "name": self.from_name,
                "email": self.from_address,
            },
            "to": [{"email": message.to}],
            "subject": message.subject,
            "textContent": message.text_body,
        });
        if let Some(html) = message.html_body {
            body["htmlContent"] = serde_json::Value::String(html);
        }

        let response = self
            .http_client
            .post(BREVO_API_URL)
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Brevo request failed: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(AppError::ExternalService(format!(
                "Brevo rejected message: {status} {error_text}"
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use markethall_common::config::EmailConfig;

    fn base_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "smtp".to_string(),
            from_address: "noreply@markethall.example".to_string(),
            from_name: "Markethall".to_string(),
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            brevo_api_key: None,
        }
    }

    #[test]
    fn incomplete_settings_disable_the_service() {
        let service = EmailService::from_config(&base_config()).unwrap();
        assert!(!service.is_enabled());
    }

    #[test]
    fn unknown_provider_is_a_config_error() {
        let mut config = base_config();
        config.provider = "pigeon".to_string();
        assert!(matches!(
            EmailService::from_config(&config),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn disabled_service_swallows_sends() {
        let service = EmailService::disabled();
        let result = service
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "subject".to_string(),
                text_body: "body".to_string(),
                html_body: None,
            })
            .await;
        assert!(result.is_ok());
    }
}
