use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

pub const RESET_SUBJECT: &str = "Password Reset - WalkIn Drive App";

/// Outbound mail seam. The auth service only needs reset emails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to: &str, token: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: String,
}

/// Delivers mail through an HTTP relay (`MAIL_API_URL`). Without a relay
/// every send fails, which rolls the reset token back.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
    frontend_url: String,
}

impl HttpMailer {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Internal(format!("failed to build mail client: {}", e)))?;

        let api_url = config.mail_api_url.clone();
        if let Some(ref url) = api_url {
            info!("Mail relay enabled: {}", url);
        } else {
            warn!("Mail relay disabled (MAIL_API_URL not set); password reset emails will fail");
        }

        Ok(Self {
            client,
            api_url,
            api_key: config.mail_api_key.clone(),
            from: config.mail_from.clone(),
            frontend_url: config.frontend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn reset_url(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.frontend_url, token)
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_password_reset(&self, to: &str, token: &str) -> Result<()> {
        let Some(api_url) = &self.api_url else {
            return Err(Error::Mail("mail relay is not configured".to_string()));
        };

        let request = MailRequest {
            from: &self.from,
            to,
            subject: RESET_SUBJECT,
            html: reset_email_html(&self.reset_url(token)),
        };

        let mut builder = self.client.post(api_url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Mail(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Mail relay rejected reset email with status {}: {}", status, body);
            return Err(Error::Mail(format!("relay returned {}", status)));
        }

        info!("Password reset email handed to relay");
        Ok(())
    }
}

fn reset_email_html(reset_url: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #007AFF;">Password Reset Request</h2>
  <p>Hello,</p>
  <p>You have requested to reset your password for your WalkIn Drive App account.</p>
  <div style="text-align: center; margin: 30px 0;">
    <a href="{url}" style="background-color: #007AFF; color: white; padding: 12px 24px; text-decoration: none; border-radius: 8px; display: inline-block;">Reset Password</a>
  </div>
  <p>Or copy and paste this link in your browser:</p>
  <p style="color: #007AFF; word-break: break-all;">{url}</p>
  <p><strong>This link will expire in 1 hour.</strong></p>
  <p>If you didn't request this password reset, please ignore this email.</p>
</div>"#,
        url = reset_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_url_embeds_token_under_frontend_url() {
        let mut config = Config::for_local("secret");
        config.frontend_url = "https://walkin.example/".into();
        let mailer = HttpMailer::new(&config).unwrap();
        assert_eq!(
            mailer.reset_url("abc123"),
            "https://walkin.example/reset-password?token=abc123"
        );
    }

    #[tokio::test]
    async fn unconfigured_relay_fails_the_send() {
        let mailer = HttpMailer::new(&Config::for_local("secret")).unwrap();
        let result = mailer.send_password_reset("a@b.co", "tok").await;
        assert!(matches!(result, Err(Error::Mail(_))));
    }

    #[test]
    fn email_body_contains_link_twice() {
        let html = reset_email_html("https://x/reset-password?token=t");
        assert_eq!(html.matches("https://x/reset-password?token=t").count(), 2);
    }
}
