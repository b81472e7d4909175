use std::{net::IpAddr, sync::Arc};

use axum::Router;
use iimpact_core_contact_contracts::ContactService;
use iimpact_models::email_address::EmailAddress;
use iimpact_templates_contracts::TemplateService;
use tokio::net::TcpListener;
use tracing::info;

mod errors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact, Template> {
    contact: Contact,
    template: Template,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub contact_page: ContactPageConfig,
}

/// Links rendered on the submission result page.
#[derive(Debug, Clone)]
pub struct ContactPageConfig {
    /// Static page holding the contact form. Non-POST requests are redirected
    /// here.
    pub url: Arc<str>,
    pub support_email: Arc<EmailAddress>,
}

impl<Contact, Template> RestServer<Contact, Template>
where
    Contact: ContactService,
    Template: TemplateService,
{
    pub fn new(contact: Contact, template: Template, config: RestServerConfig) -> Self {
        Self {
            contact,
            template,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new().merge(routes::contact::router(
            self.contact,
            self.template,
            self.config.contact_page,
        ));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}
