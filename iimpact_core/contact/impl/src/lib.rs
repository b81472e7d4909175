use std::sync::Arc;

use iimpact_core_contact_contracts::{ContactService, ContactSubmissionOutcome};
use iimpact_email_contracts::{Email, EmailService};
use iimpact_models::{
    contact::{ContactSubmission, ContactSubmissionError},
    email_address::EmailAddress,
};
use iimpact_shared_contracts::TimeService;
use tracing::{debug, info, warn};


#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Time, Email> {
    pub time: Time,
    pub email: Email,
    pub config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Recipient of all enquiries and the address visitors are pointed to if
    /// delivery fails.
    pub email: Arc<EmailAddress>,
}

impl<Time, EmailS> ContactService for ContactServiceImpl<Time, EmailS>
where
    Time: TimeService,
    EmailS: EmailService,
{
    async fn submit(&self, submission: ContactSubmission) -> ContactSubmissionOutcome {
        let mut errors = submission.validate().errors;

        if !errors.is_empty() {
            debug!(errors = errors.len(), "rejected contact form submission");
            return ContactSubmissionOutcome { submission, errors };
        }

        let delivered = self
            .email
            .send(self.make_email(&submission))
            .await
            .inspect_err(|err| warn!("Failed to send contact form email: {err}"))
            .unwrap_or(false);

        if delivered {
            info!("contact form enquiry delivered");
        } else {
            warn!("contact form enquiry could not be delivered");
            errors.push(ContactSubmissionError::DeliveryFailed {
                support: (*self.config.email).clone(),
            });
        }

        ContactSubmissionOutcome { submission, errors }
    }
}

impl<Time, EmailS> ContactServiceImpl<Time, EmailS>
where
    Time: TimeService,
{
    fn make_email(&self, submission: &ContactSubmission) -> Email {
        let name = submission.name.as_str();
        let email = submission.email.as_str();
        let message = submission.message.as_str();

        let subject = format!(
            "Website enquiry from {}",
            if name.is_empty() { "contact form" } else { name }
        );

        let date = self.time.now().format("%Y-%m-%d %H:%M:%S UTC");
        let body = format!(
            "You have received a new enquiry from the I-Impact Consult website.\n\n\
             Name: {name}\n\
             Email: {email}\n\n\
             Message:\n{message}\n\n\
             --\nSubmitted on {date}"
        );

        let reply_to = submission
            .email
            .address()
            .unwrap_or_else(|| (*self.config.email).clone());

        Email {
            recipient: (*self.config.email).clone().into(),
            subject,
            body,
            reply_to: Some(reply_to.into()),
        }
    }
}
