use std::time::Duration;

use anyhow::anyhow;
use iimpact_email_contracts::{Email, EmailService};
use iimpact_models::email_address::EmailAddressWithName;
use iimpact_utils::Apply;
use lettre::{
    message::{header, MessageBuilder},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailServiceImpl {
    pub async fn new(
        url: &str,
        from: EmailAddressWithName,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?
            .timeout(timeout)
            .build();

        Ok(Self { from, transport })
    }

    #[cfg(feature = "dummy")]
    pub async fn dummy() -> Self {
        Self::new(
            "smtp://dummy",
            "Dummy <dummy@example.com>".parse().unwrap(),
            None,
        )
        .await
        .unwrap()
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(Into::into)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        let response = self.transport.send(message).await?;
        debug!(code = %response.code(), "smtp server accepted message");

        Ok(response.is_positive())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}
