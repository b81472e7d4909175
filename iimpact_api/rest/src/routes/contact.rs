use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing, Form, Router,
};
use iimpact_core_contact_contracts::{ContactService, ContactSubmissionOutcome};
use iimpact_templates_contracts::{ContactResultTemplate, TemplateService};
use tracing::debug;

use crate::{errors::internal_server_error, models::contact::ApiContactSubmission, ContactPageConfig};

/// Paths the contact form may post to. The `.php` path keeps forms of older
/// static site builds working.
pub const CONTACT_SUBMIT_PATHS: [&str; 2] = ["/contact-submit", "/contact-submit.php"];

struct ContactState<Contact, Template> {
    contact: Contact,
    template: Template,
    page: ContactPageConfig,
}

pub fn router<Contact, Template>(
    contact: Contact,
    template: Template,
    page: ContactPageConfig,
) -> Router<()>
where
    Contact: ContactService,
    Template: TemplateService,
{
    let handler = routing::post(submit::<Contact, Template>).fallback(redirect::<Contact, Template>);

    CONTACT_SUBMIT_PATHS
        .into_iter()
        .fold(Router::new(), |router, path| {
            router.route(path, handler.clone())
        })
        .with_state(Arc::new(ContactState {
            contact,
            template,
            page,
        }))
}

async fn redirect<Contact, Template>(
    State(state): State<Arc<ContactState<Contact, Template>>>,
) -> Response
where
    Contact: ContactService,
    Template: TemplateService,
{
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.page.url.to_string())],
    )
        .into_response()
}

async fn submit<Contact, Template>(
    State(state): State<Arc<ContactState<Contact, Template>>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response
where
    Contact: ContactService,
    Template: TemplateService,
{
    let form: ApiContactSubmission = match form {
        Ok(Form(fields)) => fields.into_iter().collect(),
        Err(err) => {
            debug!("failed to parse contact form, treating all fields as missing: {err}");
            ApiContactSubmission::default()
        }
    };

    let outcome = state.contact.submit(form.into()).await;

    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    match state.template.render(&result_page(outcome, &state.page)) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => internal_server_error(err),
    }
}

fn result_page(outcome: ContactSubmissionOutcome, page: &ContactPageConfig) -> ContactResultTemplate {
    ContactResultTemplate {
        success: outcome.is_success(),
        errors: outcome.errors.iter().map(ToString::to_string).collect(),
        name: outcome.submission.name.into_inner(),
        email: outcome.submission.email.into_inner(),
        message: outcome.submission.message.into_inner(),
        contact_page: page.url.to_string(),
        support_email: page.support_email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use http_body_util::BodyExt;
    use iimpact_core_contact_contracts::MockContactService;
    use iimpact_models::contact::{ContactSubmission, ContactSubmissionError, CONTACT_FORM_ID};
    use iimpact_templates_contracts::MockTemplateService;
    use iimpact_templates_impl::TemplateServiceImpl;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::{middlewares::request_id::REQUEST_ID_HEADER, RestServer, RestServerConfig};

    const VALID_FORM: &str =
        "form_id=contact_form&company=&name=Jane+Doe&email=jane%40example.com&message=Hello";

    fn page() -> ContactPageConfig {
        ContactPageConfig {
            url: "contact.html".into(),
            support_email: Arc::new("info@iimpactconsult.org".parse().unwrap()),
        }
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            form_id: CONTACT_FORM_ID.into(),
            honeypot: String::new().into(),
            name: "Jane Doe".to_owned().into(),
            email: "jane@example.com".to_owned().into(),
            message: "Hello".to_owned().into(),
        }
    }

    fn empty_submission() -> ContactSubmission {
        ContactSubmission {
            form_id: String::new(),
            honeypot: String::new().into(),
            name: String::new().into(),
            email: String::new().into(),
            message: String::new().into(),
        }
    }

    fn post(path: &str, content_type: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    fn post_form(body: &'static str) -> Request<Body> {
        post(
            "/contact-submit",
            "application/x-www-form-urlencoded",
            body,
        )
    }

    async fn send(
        contact: MockContactService,
        request: Request<Body>,
    ) -> (StatusCode, String) {
        let template = TemplateServiceImpl::new().unwrap();
        let response = router(contact, template, page())
            .oneshot(request)
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn non_post_requests_redirect() {
        for method in [Method::GET, Method::HEAD, Method::PUT, Method::DELETE] {
            // Arrange
            let contact = MockContactService::new();
            let template = TemplateServiceImpl::new().unwrap();
            let request = Request::builder()
                .method(method.clone())
                .uri("/contact-submit")
                .body(Body::empty())
                .unwrap();

            // Act
            let response = router(contact, template, page())
                .oneshot(request)
                .await
                .unwrap();

            // Assert
            assert_eq!(response.status(), StatusCode::FOUND, "{method}");
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                "contact.html"
            );
            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            submission(),
            ContactSubmissionOutcome {
                submission: submission(),
                errors: Vec::new(),
            },
        );

        // Act
        let (status, body) = send(contact, post_form(VALID_FORM)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Message sent successfully"));
        assert!(body.contains("Jane Doe"));
        assert!(body.contains("jane@example.com"));
        assert!(body.contains("Hello"));
        assert!(!body.contains("alert-danger"));
    }

    #[tokio::test]
    async fn repeated_field_keeps_last_value() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            submission(),
            ContactSubmissionOutcome {
                submission: submission(),
                errors: Vec::new(),
            },
        );

        // Act
        let (status, body) = send(
            contact,
            post_form(
                "form_id=contact_form&name=Jane&name=Jane+Doe\
                 &email=jane%40example.com&message=Hello",
            ),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<dd class="col-sm-8">Jane Doe</dd>"#));
    }

    #[tokio::test]
    async fn same_submission_same_response() {
        // Arrange
        let mut contact = MockContactService::new();
        contact
            .expect_submit()
            .times(2)
            .with(mockall::predicate::eq(submission()))
            .returning(|_| {
                Box::pin(std::future::ready(ContactSubmissionOutcome {
                    submission: submission(),
                    errors: Vec::new(),
                }))
            });
        let app = router(contact, TemplateServiceImpl::new().unwrap(), page());

        // Act
        let first = app.clone().oneshot(post_form(VALID_FORM)).await.unwrap();
        let second = app.oneshot(post_form(VALID_FORM)).await.unwrap();

        // Assert
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        let first = first.into_body().collect().await.unwrap().to_bytes();
        let second = second.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn legacy_path() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            submission(),
            ContactSubmissionOutcome {
                submission: submission(),
                errors: Vec::new(),
            },
        );
        let request = post(
            "/contact-submit.php",
            "application/x-www-form-urlencoded",
            VALID_FORM,
        );

        // Act
        let (status, _) = send(contact, request).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn validation_errors() {
        // Arrange
        let submission = ContactSubmission {
            form_id: "wrong".into(),
            email: "not-an-email".to_owned().into(),
            ..submission()
        };
        let contact = MockContactService::new().with_submit(
            submission.clone(),
            ContactSubmissionOutcome {
                submission,
                errors: vec![
                    ContactSubmissionError::FormTokenMismatch,
                    ContactSubmissionError::InvalidEmail,
                ],
            },
        );

        // Act
        let (status, body) = send(
            contact,
            post_form("form_id=wrong&name=Jane+Doe&email=not-an-email&message=Hello"),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Something went wrong"));
        assert!(body.contains("<li>Invalid form submission. Please try again.</li>"));
        assert!(body.contains("<li>Please provide a valid email address.</li>"));
        assert!(body.contains("not-an-email"));
    }

    #[tokio::test]
    async fn delivery_failed() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            submission(),
            ContactSubmissionOutcome {
                submission: submission(),
                errors: vec![ContactSubmissionError::DeliveryFailed {
                    support: "info@iimpactconsult.org".parse().unwrap(),
                }],
            },
        );

        // Act
        let (status, body) = send(contact, post_form(VALID_FORM)).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(
            "We could not deliver your message. Please email info@iimpactconsult.org directly."
        ));
    }

    #[tokio::test]
    async fn missing_fields_are_empty() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            empty_submission(),
            ContactSubmissionOutcome {
                submission: empty_submission(),
                errors: vec![ContactSubmissionError::FormTokenMismatch],
            },
        );

        // Act
        let (status, body) = send(contact, post_form("")).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid form submission. Please try again."));
    }

    #[tokio::test]
    async fn unparsable_body_is_treated_as_empty() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            empty_submission(),
            ContactSubmissionOutcome {
                submission: empty_submission(),
                errors: vec![ContactSubmissionError::FormTokenMismatch],
            },
        );
        let request = post("/contact-submit", "application/json", r#"{"name":"Jane"}"#);

        // Act
        let (status, _) = send(contact, request).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn submitted_text_is_escaped() {
        // Arrange
        let submission = ContactSubmission {
            name: "<script>alert(1)</script>".to_owned().into(),
            ..submission()
        };
        let contact = MockContactService::new().with_submit(
            submission.clone(),
            ContactSubmissionOutcome {
                submission,
                errors: Vec::new(),
            },
        );

        // Act
        let (status, body) = send(
            contact,
            post_form(
                "form_id=contact_form&name=%3Cscript%3Ealert(1)%3C%2Fscript%3E\
                 &email=jane%40example.com&message=Hello",
            ),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("<script>alert"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[tokio::test]
    async fn result_page_model() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            submission(),
            ContactSubmissionOutcome {
                submission: submission(),
                errors: vec![ContactSubmissionError::SpamSuspected],
            },
        );
        let template = MockTemplateService::new().with_render(
            ContactResultTemplate {
                success: false,
                errors: vec!["Spam detected.".into()],
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                message: "Hello".into(),
                contact_page: "contact.html".into(),
                support_email: "info@iimpactconsult.org".into(),
            },
            "rendered".into(),
        );

        // Act
        let response = router(contact, template, page())
            .oneshot(post_form(VALID_FORM))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"rendered");
    }

    #[tokio::test]
    async fn render_failure() {
        // Arrange
        let contact = MockContactService::new().with_submit(
            submission(),
            ContactSubmissionOutcome {
                submission: submission(),
                errors: Vec::new(),
            },
        );
        let mut template = MockTemplateService::new();
        template
            .expect_render::<ContactResultTemplate>()
            .once()
            .return_once(|_| Err(anyhow!("template missing")));

        // Act
        let response = router(contact, template, page())
            .oneshot(post_form(VALID_FORM))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        // Arrange
        let server = RestServer::new(
            MockContactService::new(),
            TemplateServiceImpl::new().unwrap(),
            RestServerConfig { contact_page: page() },
        );
        let request = Request::builder()
            .uri("/contact-submit")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = server.router().oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
