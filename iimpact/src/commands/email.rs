use anyhow::ensure;
use clap::Subcommand;
use iimpact_config::Config;
use iimpact_email_contracts::{Email, EmailService};
use iimpact_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let email_service = email::connect(&config.email).await?;

    let ok = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Contact form email delivery seems to be working!".into(),
            reply_to: Some(config.contact.email.into()),
        })
        .await?;

    ensure!(ok, "Failed to send email");
    info!("Test email accepted by smtp server");

    Ok(())
}
