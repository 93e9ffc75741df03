//! Project-specific utilities live here.

use folio_http::error::AppError;
use serde_json::json;

/// Validates a required free-text field and returns the trimmed value.
///
/// Blank and whitespace-only input is rejected with a validation error
/// naming the offending field. `field` is the display label used in the
/// error message, e.g. "Name" or "Title".
pub fn required_trimmed(value: &str, field: &'static str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(
            vec![json!({"field": field.to_ascii_lowercase(), "error": "required"})],
            format!("{field} is required."),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_surrounding_whitespace() {
        let value = required_trimmed("  Ursula K. Le Guin  ", "Name").unwrap();
        assert_eq!(value, "Ursula K. Le Guin");
    }

    #[test]
    fn rejects_empty_input() {
        let err = required_trimmed("", "Name").unwrap_err();
        match err {
            AppError::Validation { message, details, .. } => {
                assert_eq!(message, "Name is required.");
                assert_eq!(details[0]["field"], "name");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_whitespace_only_input() {
        let err = required_trimmed(" \t\n ", "Title").unwrap_err();
        match err {
            AppError::Validation { message, .. } => {
                assert_eq!(message, "Title is required.");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
