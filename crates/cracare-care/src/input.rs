//! Normalization of free-text request fields.

use cracare_core::error::{CraError, CraResult};

/// Trimmed value of a mandatory field; blank is a validation error.
pub(crate) fn required(field: &str, value: &str) -> CraResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CraError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trimmed optional field; blank collapses to `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Patch form of [`optional`]: an explicit blank clears the column.
pub(crate) fn nullable(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(optional)
}

/// Patch form of [`required`]: absent stays absent, blank is rejected.
pub(crate) fn required_patch(field: &str, value: Option<String>) -> CraResult<Option<String>> {
    value.map(|v| required(field, &v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Ana ").unwrap(), "Ana");
        assert!(matches!(
            required("name", "   "),
            Err(CraError::Validation { .. })
        ));
    }

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(optional(Some(" ".into())), None);
        assert_eq!(optional(Some(" x ".into())), Some("x".into()));
        assert_eq!(nullable(Some(Some("".into()))), Some(None));
        assert_eq!(nullable(None), None);
    }

    #[test]
    fn required_patch_keeps_absent() {
        assert_eq!(required_patch("name", None).unwrap(), None);
        assert!(required_patch("name", Some("".into())).is_err());
    }
}
