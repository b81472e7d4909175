use std::sync::Arc;

use iimpact_api_rest::{ContactPageConfig, RestServerConfig};
use iimpact_config::Config;
use iimpact_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use types::{Contact, Email, RestServer, Template, Time};

pub mod types;

/// Builds the service graph from the config and the connected SMTP transport.
#[derive(Debug, Clone)]
pub struct Provider {
    email: Email,
    config: ConfigProvider,
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email) -> Self {
        Self { email, config }
    }

    pub fn rest_server(&self) -> anyhow::Result<RestServer> {
        Ok(RestServer::new(
            self.contact(),
            self.template()?,
            self.config.rest_server_config.clone(),
        ))
    }

    fn contact(&self) -> Contact {
        ContactServiceImpl {
            time: Time::default(),
            email: self.email.clone(),
            config: self.config.contact_service_config.clone(),
        }
    }

    fn template(&self) -> anyhow::Result<Template> {
        Template::new()
    }
}

/// Service configs derived from the loaded config file.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    rest_server_config: RestServerConfig,
    contact_service_config: ContactServiceConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> Self {
        let support_email = Arc::new(config.contact.email.clone());

        // API
        let rest_server_config = RestServerConfig {
            contact_page: ContactPageConfig {
                url: config.contact.contact_page.as_str().into(),
                support_email: Arc::clone(&support_email),
            },
        };

        // Core
        let contact_service_config = ContactServiceConfig {
            email: support_email,
        };

        Self {
            rest_server_config,
            contact_service_config,
        }
    }
}
