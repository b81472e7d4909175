use iimpact_models::contact::ContactSubmission;

/// Form fields posted by the contact page. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiContactSubmission {
    pub form_id: String,
    /// Honeypot, hidden from humans
    pub company: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Collects decoded form pairs. If a key is repeated the last value wins and
/// unknown keys are ignored.
impl FromIterator<(String, String)> for ApiContactSubmission {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |mut form, (key, value)| {
                match key.as_str() {
                    "form_id" => form.form_id = value,
                    "company" => form.company = value,
                    "name" => form.name = value,
                    "email" => form.email = value,
                    "message" => form.message = value,
                    _ => {}
                }
                form
            })
    }
}

impl From<ApiContactSubmission> for ContactSubmission {
    fn from(value: ApiContactSubmission) -> Self {
        Self {
            form_id: value.form_id,
            honeypot: value.company.into(),
            name: value.name.into(),
            email: value.email.into(),
            message: value.message.into(),
        }
    }
}
