//! Domain types: placeholder vocabulary, templates, and fragment sets.
//!
//! All types are serializable via serde so they can travel as YAML config,
//! JSON request bodies, or CLI output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::substitution;

/// Name of the protected system template. It cannot be updated or deleted
/// and is the fallback when a render request names no template.
pub const DEFAULT_TEMPLATE: &str = "Default";

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

/// The fixed, case-sensitive vocabulary of tokens a template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    Header,
    Body,
    Footer,
    CorrespondentName,
    SenderName,
}

impl Placeholder {
    /// All placeholders in a stable order.
    pub const ALL: [Placeholder; 5] = [
        Placeholder::Header,
        Placeholder::Body,
        Placeholder::Footer,
        Placeholder::CorrespondentName,
        Placeholder::SenderName,
    ];

    /// The literal token as it appears inside a template document.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Header => "%%EMAIL_HEADER%%",
            Placeholder::Body => "%%EMAIL_BODY%%",
            Placeholder::Footer => "%%EMAIL_FOOTER%%",
            Placeholder::CorrespondentName => "%%EMAIL_NAME%%",
            Placeholder::SenderName => "%%EMAIL_SENDER%%",
        }
    }

    pub fn from_token(token: &str) -> Option<Placeholder> {
        Placeholder::ALL.into_iter().find(|p| p.token() == token)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Header => write!(f, "Header"),
            Placeholder::Body => write!(f, "Body"),
            Placeholder::Footer => write!(f, "Footer"),
            Placeholder::CorrespondentName => write!(f, "CorrespondentName"),
            Placeholder::SenderName => write!(f, "SenderName"),
        }
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// Caller-supplied content for one render call, one optional value per placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fragments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(alias = "correspondentName", skip_serializing_if = "Option::is_none")]
    pub correspondent_name: Option<String>,
    #[serde(alias = "senderName", skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
}

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        *self.slot_mut(placeholder) = Some(value.into());
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::Header => self.header.as_deref(),
            Placeholder::Body => self.body.as_deref(),
            Placeholder::Footer => self.footer.as_deref(),
            Placeholder::CorrespondentName => self.correspondent_name.as_deref(),
            Placeholder::SenderName => self.sender_name.as_deref(),
        }
    }

    /// `true` when the value is absent or whitespace only.
    pub fn is_blank(&self, placeholder: Placeholder) -> bool {
        self.get(placeholder).map_or(true, |v| v.trim().is_empty())
    }

    /// Supplied values, in [`Placeholder::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Placeholder, &str)> {
        Placeholder::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
    }

    fn slot_mut(&mut self, placeholder: Placeholder) -> &mut Option<String> {
        match placeholder {
            Placeholder::Header => &mut self.header,
            Placeholder::Body => &mut self.body,
            Placeholder::Footer => &mut self.footer,
            Placeholder::CorrespondentName => &mut self.correspondent_name,
            Placeholder::SenderName => &mut self.sender_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A named HTML document containing zero or more placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(alias = "htmlFormat")]
    pub html_format: String,
}

impl Template {
    pub fn new(name: impl Into<String>, html_format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html_format: html_format.into(),
        }
    }

    /// Whether this is the protected system template.
    pub fn is_protected(&self) -> bool {
        self.name == DEFAULT_TEMPLATE
    }

    /// Placeholders that occur at least once in the document.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        Placeholder::ALL
            .into_iter()
            .filter(|p| self.html_format.contains(p.token()))
            .collect()
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.html_format.contains(placeholder.token())
    }

    /// Substitute every recognised token with its fragment value.
    ///
    /// Absent fragments become the empty string. Substituted text is never
    /// rescanned.
    pub fn render(&self, fragments: &Fragments) -> String {
        substitution::substitute(&self.html_format, fragments)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
