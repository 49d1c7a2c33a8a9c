//! Request validation rules applied before and after template lookup.

use std::collections::BTreeSet;

use mailplate_core::{
    substitution::find_marker, Fragments, Placeholder, Template, TemplateError, DEFAULT_TEMPLATE,
};

pub const FIELD_EMAIL: &str = "Email";
pub const FIELD_TITLE: &str = "Title";

/// Return the trimmed-non-blank value or a `BadEmailModel` naming `field`.
pub fn require<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, TemplateError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(TemplateError::bad_model(field, "is required")),
    }
}

/// Check the basic `local@domain.tld` shape of a recipient address.
///
/// Whitespace anywhere (including leading/trailing) is rejected rather than
/// trimmed.
pub fn validate_address(address: Option<&str>) -> Result<&str, TemplateError> {
    let address = require(FIELD_EMAIL, address)?;
    let invalid = |reason: &str| TemplateError::bad_model(FIELD_EMAIL, reason);

    if address.trim() != address {
        return Err(invalid("must not have leading or trailing whitespace"));
    }
    if address.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let mut parts = address.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("must contain exactly one '@'"));
    };
    if local.is_empty() {
        return Err(invalid("is missing the part before '@'"));
    }
    if domain.is_empty() {
        return Err(invalid("is missing the domain"));
    }
    if !domain.contains('.') {
        return Err(invalid("domain must include a TLD (e.g., .com, .org)"));
    }
    if domain.split('.').any(str::is_empty) {
        return Err(invalid("domain must not contain empty labels"));
    }
    if !email_address::EmailAddress::is_valid(address) {
        return Err(invalid("is not a valid email address"));
    }

    Ok(address)
}

/// Blank or absent names fall back to the protected `Default` template.
pub fn resolve_template_name(name: Option<&str>) -> &str {
    match name {
        Some(n) if !n.trim().is_empty() => n,
        _ => DEFAULT_TEMPLATE,
    }
}

/// Every required placeholder present in `template` needs a non-blank fragment.
pub fn check_required(
    template: &Template,
    fragments: &Fragments,
    required: &BTreeSet<Placeholder>,
) -> Result<(), TemplateError> {
    for placeholder in required {
        if template.contains(*placeholder) && fragments.is_blank(*placeholder) {
            return Err(TemplateError::TemplateRequiredFieldNotSet {
                field: *placeholder,
            });
        }
    }
    Ok(())
}

/// Reject fragment values that still carry a raw `%%EMAIL_…%%` marker.
pub fn check_placeholder_misuse(fragments: &Fragments) -> Result<(), TemplateError> {
    for (placeholder, value) in fragments.iter() {
        if let Some(token) = find_marker(value) {
            return Err(TemplateError::EmailStringContainsPlaceholder {
                field: placeholder.to_string(),
                token: token.to_string(),
            });
        }
    }
    Ok(())
}
