use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Fields required to create or replace a template
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TemplateDraft {
    #[validate(custom(function = "not_blank", message = "title is required"))]
    #[serde(default)]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "subject is required"))]
    #[serde(default)]
    pub subject: String,
    #[validate(custom(function = "not_blank", message = "body is required"))]
    #[serde(default)]
    pub body: String,
}

impl TemplateDraft {
    pub fn new(
        title: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Rejects values that are empty once surrounding whitespace is trimmed
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Request to render a template body as a Word document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub body: String,
}

/// Recipient rows entered in a grid rather than uploaded as a file
///
/// Request body:
/// ```json
/// {
///   "email_column": "Email",
///   "headers": ["First Name", "Email"],
///   "grid_data": [{"First Name": "Ann", "Email": "ann@x.com"}]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GridUpload {
    #[validate(length(min = 1, message = "email_column is required"))]
    pub email_column: String,
    /// Explicit column order; derived from the rows when absent
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    pub grid_data: Vec<serde_json::Map<String, Value>>,
}
