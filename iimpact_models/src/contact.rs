use nutype::nutype;
use thiserror::Error;

use crate::email_address::EmailAddress;

/// Token the contact page embeds in its form. Submissions carrying anything
/// else did not originate from our form.
pub const CONTACT_FORM_ID: &str = "contact_form";

/// A contact form submission as received from the client.
///
/// Every field except `form_id` is trimmed on construction. Trimming strips
/// spaces, tabs, line breaks, NUL and vertical tabs only, so other Unicode
/// whitespace such as U+00A0 counts as content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub form_id: String,
    pub honeypot: ContactHoneypot,
    pub name: ContactAuthorName,
    pub email: ContactAuthorEmail,
    pub message: ContactMessageContent,
}

/// Hidden field that only bots fill in.
#[nutype(
    sanitize(with = |s: String| trim_form_value(&s)),
    derive(Debug, Clone, PartialEq, Eq, From, Deref)
)]
pub struct ContactHoneypot(String);

#[nutype(
    sanitize(with = |s: String| trim_form_value(&s)),
    derive(Debug, Clone, PartialEq, Eq, From, Deref)
)]
pub struct ContactAuthorName(String);

#[nutype(
    sanitize(with = |s: String| trim_form_value(&s)),
    derive(Debug, Clone, PartialEq, Eq, From, Deref)
)]
pub struct ContactAuthorEmail(String);

#[nutype(
    sanitize(with = |s: String| trim_form_value(&s)),
    derive(Debug, Clone, PartialEq, Eq, From, Deref)
)]
pub struct ContactMessageContent(String);

fn trim_form_value(value: &str) -> String {
    value
        .trim_matches([' ', '\t', '\n', '\r', '\0', '\x0B'])
        .to_owned()
}

impl ContactAuthorEmail {
    /// Returns the parsed address if the field holds a syntactically valid
    /// email address.
    ///
    /// Only ASCII addresses are accepted, a domain name needs at least two
    /// labels and display names are rejected.
    pub fn address(&self) -> Option<EmailAddress> {
        let options = ::email_address::Options::default()
            .with_required_tld()
            .without_display_text();

        if !self.is_ascii()
            || ::email_address::EmailAddress::parse_with_options(self, options).is_err()
        {
            return None;
        }

        self.parse().ok()
    }
}

/// Problems with a submission, in the wording shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactSubmissionError {
    #[error("Invalid form submission. Please try again.")]
    FormTokenMismatch,
    #[error("Spam detected.")]
    SpamSuspected,
    #[error("Please let us know your name.")]
    MissingName,
    #[error("Please provide a valid email address.")]
    InvalidEmail,
    #[error("Please add a message so we know how to help.")]
    MissingMessage,
    #[error("We could not deliver your message. Please email {support} directly.")]
    DeliveryFailed { support: EmailAddress },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactValidation {
    /// All failed checks, in the order the checks ran.
    pub errors: Vec<ContactSubmissionError>,
}

impl ContactValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ContactSubmission {
    /// Runs every check against the submission. A failing check does not stop
    /// the remaining ones.
    pub fn validate(&self) -> ContactValidation {
        let mut errors = Vec::new();

        if self.form_id != CONTACT_FORM_ID {
            errors.push(ContactSubmissionError::FormTokenMismatch);
        }

        if !self.honeypot.is_empty() {
            errors.push(ContactSubmissionError::SpamSuspected);
        }

        if self.name.is_empty() {
            errors.push(ContactSubmissionError::MissingName);
        }

        if self.email.address().is_none() {
            errors.push(ContactSubmissionError::InvalidEmail);
        }

        if self.message.is_empty() {
            errors.push(ContactSubmissionError::MissingMessage);
        }

        ContactValidation { errors }
    }
}
