use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// A page template. `NAME` doubles as the file name, so templates ending in
/// `.html` are rendered with HTML escaping.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: (&str, &str) = ("base.html", include_str!("../templates/base.html"));

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactResultTemplate("contact_result.html"),
}

/// Confirmation or error page shown after a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResultTemplate {
    pub success: bool,
    /// User-facing error messages, only shown if `success` is false.
    pub errors: Vec<String>,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Target of the "Back to contact page" link.
    pub contact_page: String,
    pub support_email: String,
}
