//! Translation of [`TemplateError`] into what an HTTP boundary returns:
//! a status code and a `{ "message": … }` body.

use serde::{Deserialize, Serialize};

use mailplate_core::{ErrorKind, TemplateError};

const INTERNAL_MESSAGE: &str = "internal template storage error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub kind: ErrorKind,
    pub body: ErrorBody,
}

impl ErrorResponse {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }
}

impl From<&TemplateError> for ErrorResponse {
    fn from(err: &TemplateError) -> Self {
        let kind = err.kind();
        let message = match kind {
            // Storage errors carry filesystem paths; keep them in logs only.
            ErrorKind::Internal => {
                tracing::warn!(error = %err, "template storage failure");
                INTERNAL_MESSAGE.to_string()
            }
            _ => err.to_string(),
        };
        Self {
            status: kind.status_code(),
            kind,
            body: ErrorBody { message },
        }
    }
}

impl From<TemplateError> for ErrorResponse {
    fn from(err: TemplateError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailplate_core::{Action, Placeholder};

    #[test]
    fn maps_every_kind_to_its_status() {
        let cases = [
            (TemplateError::bad_model("Email", "is required"), 400),
            (TemplateError::TemplateRequiredFieldNotSet { field: Placeholder::Body }, 400),
            (
                TemplateError::EmailStringContainsPlaceholder {
                    field: "Body".into(),
                    token: "%%EMAIL_BODY%%".into(),
                },
                400,
            ),
            (TemplateError::not_found("X"), 404),
            (TemplateError::DuplicateTemplateName { name: "X".into() }, 400),
            (
                TemplateError::Unauthorized { name: "Default".into(), action: Action::Deleted },
                401,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(&err).status, status, "{err}");
        }
    }

    #[test]
    fn body_serializes_as_message_object() {
        let response = ErrorResponse::from(TemplateError::not_found("Welcome"));
        let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "template not found: Welcome" }));
    }

    #[test]
    fn storage_errors_hide_paths() {
        let err = TemplateError::Storage {
            path: "/secret/dir/x.html".into(),
            source: std::io::Error::other("denied"),
        };
        let response = ErrorResponse::from(&err);
        assert_eq!(response.status, 500);
        assert_eq!(response.kind, ErrorKind::Internal);
        assert!(!response.body.message.contains("/secret"));
    }
}
