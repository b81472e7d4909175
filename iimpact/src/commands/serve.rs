use iimpact_config::Config;
use iimpact_email_contracts::EmailService;
use iimpact_utils::iimpact_version;
use tracing::info;

use crate::{
    email,
    environment::{ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting iimpact {}", iimpact_version());

    info!("Connecting to smtp server");
    let email = email::connect(&config.email).await?;
    email.ping().await?;

    let provider = Provider::new(ConfigProvider::new(&config), email);
    let server = provider.rest_server()?;
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
