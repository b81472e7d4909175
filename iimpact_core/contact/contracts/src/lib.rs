use std::future::Future;

use iimpact_models::contact::{ContactSubmission, ContactSubmissionError};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validate the submission and, if it passes, forward it by email.
    fn submit(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = ContactSubmissionOutcome> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmissionOutcome {
    /// The sanitized submission, echoed back to the visitor.
    pub submission: ContactSubmission,
    /// Validation and delivery errors. Empty iff the enquiry was delivered.
    pub errors: Vec<ContactSubmissionError>,
}

impl ContactSubmissionOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit(
        mut self,
        submission: ContactSubmission,
        outcome: ContactSubmissionOutcome,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(outcome)));
        self
    }
}
