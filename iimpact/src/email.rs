use anyhow::Context;
use iimpact_config::EmailConfig;
use iimpact_email_impl::EmailServiceImpl;

/// Connect to the SMTP server
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(
        &config.smtp_url,
        config.from.clone(),
        config.timeout.as_ref().map(|timeout| timeout.0),
    )
    .await
    .context("Failed to connect to SMTP server")
}
