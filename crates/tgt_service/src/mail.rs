use std::env;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client;
use tracing::info;

pub const DEFAULT_FROM: &str = "noreply@upov.int";
pub const DEFAULT_BCC: &str = "tgtemplate@upov.int";
pub const DEFAULT_REGION: &str = "eu-central-1";

/// Returned in place of a provider message id when sending is switched off.
pub const DISABLED_MESSAGE_ID: &str = "disabled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers one message and returns the provider's message id.
    async fn send(&self, mail: &OutgoingMail) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Kill switch: nothing leaves the process unless `SEND_MAIL=TRUE`.
    pub enabled: bool,
    pub from: String,
    pub bcc: Option<String>,
    pub region: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        let bcc = env::var("MAIL_BCC").unwrap_or_else(|_| DEFAULT_BCC.to_string());

        Self {
            enabled: env::var("SEND_MAIL").map(|v| v == "TRUE").unwrap_or(false),
            from: env::var("MAIL_FROM_ID").unwrap_or_else(|_| DEFAULT_FROM.to_string()),
            bcc: Some(bcc).filter(|b| !b.is_empty()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
        }
    }
}

/// SES v2 transport.
pub struct SesMailer {
    client: Client,
    config: MailConfig,
}

impl SesMailer {
    pub fn new(client: Client, config: MailConfig) -> Self {
        Self { client, config }
    }

    /// Builds an SES client from the ambient AWS credential chain.
    pub async fn from_config(config: MailConfig) -> Self {
        let region = RegionProviderChain::default_provider().or_else(Region::new(config.region.clone()));
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        Self::new(Client::new(&shared), config)
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<String> {
        if !self.config.enabled {
            info!(to = %mail.to, subject = %mail.subject, "[MAIL DISABLED] would send");
            return Ok(DISABLED_MESSAGE_ID.to_string());
        }

        let mut destination = Destination::builder().to_addresses(&mail.to);
        if let Some(bcc) = &self.config.bcc {
            destination = destination.bcc_addresses(bcc);
        }

        let subject = Content::builder()
            .data(&mail.subject)
            .charset("UTF-8")
            .build()
            .context("Failed to build subject")?;
        let html = Content::builder()
            .data(&mail.html_body)
            .charset("UTF-8")
            .build()
            .context("Failed to build body")?;

        let message = Message::builder()
            .subject(subject)
            .body(Body::builder().html(html).build())
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(&self.config.from)
            .destination(destination.build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .with_context(|| format!("SES rejected message to {}", mail.to))?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}
