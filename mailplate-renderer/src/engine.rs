//! Rendering pipeline — [`EmailRequest`] in, [`RenderedEmail`] out.
//!
//! # Stages
//!
//! | # | Rule                         | Failure                           |
//! |---|------------------------------|-----------------------------------|
//! | 1 | recipient / title present    | `BadEmailModel`                   |
//! | 2 | recipient address shape      | `BadEmailModel`                   |
//! | 3 | blank name → `Default`       | —                                 |
//! | 4 | template lookup              | `TemplateNotFound` (unchanged)    |
//! | 5 | required placeholders filled | `TemplateRequiredFieldNotSet`     |
//! | 6 | no raw tokens in fragments   | `EmailStringContainsPlaceholder`  |
//! | 7 | single-pass substitution     | —                                 |
//!
//! Rendering performs no writes; a failed request leaves nothing behind.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use mailplate_core::{
    Fragments, MailplateConfig, Placeholder, Template, TemplateError, TemplateStore,
};

use crate::validate;

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// One render request as received from an inbound caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailRequest {
    #[serde(alias = "email", alias = "to")]
    pub recipient: Option<String>,
    #[serde(alias = "subject")]
    pub title: Option<String>,
    #[serde(alias = "templateName")]
    pub template_name: Option<String>,
    #[serde(flatten)]
    pub fragments: Fragments,
}

impl EmailRequest {
    pub fn new(recipient: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            recipient: Some(recipient.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.template_name = Some(name.into());
        self
    }

    pub fn fragment(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.fragments = self.fragments.with(placeholder, value);
        self
    }
}

/// A fully substituted email, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub recipient: String,
    pub subject: String,
    /// Name actually rendered, after the blank-name fallback.
    pub template_name: String,
    pub html: String,
}

// ---------------------------------------------------------------------------
// RenderEngine
// ---------------------------------------------------------------------------

/// Stateless render pipeline. Safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEngine {
    required: BTreeSet<Placeholder>,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new([Placeholder::Body])
    }
}

impl RenderEngine {
    /// Engine enforcing `required` placeholders.
    pub fn new(required: impl IntoIterator<Item = Placeholder>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }

    pub fn from_config(config: &MailplateConfig) -> Self {
        Self::new(config.required_placeholders.iter().copied())
    }

    pub fn required(&self) -> &BTreeSet<Placeholder> {
        &self.required
    }

    /// Validate `request`, resolve its template from `store`, and render.
    #[tracing::instrument(
        name = "render.request",
        skip(self, store, request),
        fields(template = validate::resolve_template_name(request.template_name.as_deref()))
    )]
    pub fn render_request(
        &self,
        store: &dyn TemplateStore,
        request: &EmailRequest,
    ) -> Result<RenderedEmail, TemplateError> {
        let recipient = validate::require(validate::FIELD_EMAIL, request.recipient.as_deref())?;
        let subject = validate::require(validate::FIELD_TITLE, request.title.as_deref())?;
        let recipient = validate::validate_address(Some(recipient))?;

        let template_name = validate::resolve_template_name(request.template_name.as_deref());
        let template = store.get(template_name)?;
        let html = self.render_template(&template, &request.fragments)?;

        tracing::debug!(bytes = html.len(), "rendered email");
        Ok(RenderedEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            template_name: template.name,
            html,
        })
    }

    /// Apply the placeholder rules to an already-resolved template.
    pub fn render_template(
        &self,
        template: &Template,
        fragments: &Fragments,
    ) -> Result<String, TemplateError> {
        validate::check_required(template, fragments, &self.required)?;
        validate::check_placeholder_misuse(fragments)?;
        Ok(template.render(fragments))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
