//! `mailplate render` — compose an email from a stored template.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mailplate_core::Placeholder;
use mailplate_renderer::EmailRequest;

use crate::reject;

/// Render a template with the given fragments.
///
/// Flags override values read from `--request`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON request body (`email`, `subject`, `templateName`, fragments).
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,
    /// Recipient address.
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    /// Template name; blank or absent renders "Default".
    #[arg(long)]
    pub template: Option<String>,
    #[arg(long)]
    pub header: Option<String>,
    #[arg(long)]
    pub body: Option<String>,
    #[arg(long)]
    pub footer: Option<String>,
    /// Correspondent name.
    #[arg(long)]
    pub name: Option<String>,
    /// Sender name shown in the body.
    #[arg(long)]
    pub sender: Option<String>,
    /// Print the full outbound envelope as JSON instead of the HTML.
    #[arg(long)]
    pub json: bool,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let app = crate::open()?;
        let json = self.json;
        let request = self.into_request()?;

        let email = app.mailer.compose(&request).map_err(reject)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&email)?);
        } else {
            println!("{}", email.html);
        }
        Ok(())
    }

    fn into_request(self) -> Result<EmailRequest> {
        let mut request = match &self.request {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => EmailRequest::default(),
        };

        if let Some(to) = self.to {
            request.recipient = Some(to);
        }
        if let Some(subject) = self.subject {
            request.title = Some(subject);
        }
        if let Some(template) = self.template {
            request.template_name = Some(template);
        }
        let overrides = [
            (Placeholder::Header, self.header),
            (Placeholder::Body, self.body),
            (Placeholder::Footer, self.footer),
            (Placeholder::CorrespondentName, self.name),
            (Placeholder::SenderName, self.sender),
        ];
        for (placeholder, value) in overrides {
            if let Some(value) = value {
                request = request.fragment(placeholder, value);
            }
        }
        Ok(request)
    }
}
