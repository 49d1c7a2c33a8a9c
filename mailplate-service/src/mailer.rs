//! Render a request into the envelope a transport collaborator receives.
//!
//! Delivery and sent-mail logging happen outside this crate; [`OutboundEmail`]
//! carries exactly `(to, subject, html, from_name, from_email)`.

use std::sync::Arc;

use serde::Serialize;

use mailplate_core::{SenderIdentity, TemplateError, TemplateStore};
use mailplate_renderer::{EmailRequest, RenderEngine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub to_address: String,
    pub subject: String,
    pub html: String,
    pub from_name: String,
    pub from_email: String,
    /// Template actually used, after the blank-name fallback.
    pub template_name: String,
}

pub struct Mailer {
    store: Arc<dyn TemplateStore>,
    engine: RenderEngine,
    sender: SenderIdentity,
}

impl Mailer {
    pub fn new(store: Arc<dyn TemplateStore>, engine: RenderEngine, sender: SenderIdentity) -> Self {
        Self {
            store,
            engine,
            sender,
        }
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn sender(&self) -> &SenderIdentity {
        &self.sender
    }

    /// Validate and render `request`. Nothing is written on failure.
    pub fn compose(&self, request: &EmailRequest) -> Result<OutboundEmail, TemplateError> {
        let rendered = self.engine.render_request(self.store.as_ref(), request)?;
        Ok(OutboundEmail {
            to_address: rendered.recipient,
            subject: rendered.subject,
            html: rendered.html,
            from_name: self.sender.name.clone(),
            from_email: self.sender.email.clone(),
            template_name: rendered.template_name,
        })
    }
}
