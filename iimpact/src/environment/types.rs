use iimpact_core_contact_impl::ContactServiceImpl;
use iimpact_email_impl::EmailServiceImpl;
use iimpact_shared_impl::TimeServiceImpl;
use iimpact_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = iimpact_api_rest::RestServer<Contact, Template>;

// Email
pub type Email = EmailServiceImpl;

// Template
pub type Template = TemplateServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Core
pub type Contact = ContactServiceImpl<Time, Email>;
