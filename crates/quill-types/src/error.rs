use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// A single violated constraint on a request body. `path` names the offending
/// field in wire (camelCase) form, nested fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: String,
    pub message: String,
    pub path: Vec<String>,
}

/// The two error body shapes the API produces: a field-error list for
/// validation failures, a single message for everything else.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Validation { errors: Vec<FieldError> },
    Message { message: String },
}

/// Validate a request body, flattening every violated constraint into wire
/// field errors. Pure and synchronous.
pub fn validate<T: Validate>(value: &T) -> Result<(), Vec<FieldError>> {
    match value.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(flatten(&errors, &[])),
    }
}

fn flatten(errors: &ValidationErrors, prefix: &[String]) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, kind) in errors.errors() {
        let mut path = prefix.to_vec();
        path.push(camel_case(field));
        match kind {
            ValidationErrorsKind::Field(violations) => {
                for violation in violations {
                    out.push(FieldError {
                        code: violation.code.to_string(),
                        message: violation
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", path.join("."))),
                        path: path.clone(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => out.extend(flatten(nested, &path)),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let mut item_path = path.clone();
                    item_path.push(index.to_string());
                    out.extend(flatten(nested, &item_path));
                }
            }
        }
    }
    out
}

// The validator derive reports Rust field identifiers; the wire uses
// camelCase. Every validated field is camelCased on the wire, so a plain
// conversion suffices.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
