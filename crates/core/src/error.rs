//! Error taxonomy shared by the core and its collaborators

use shared::MalformedRecord;

/// Errors surfaced to callers of setup, data-integrity and storage operations.
///
/// Manipulating a vanished object is not an error; those calls silently do nothing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    /// A user-supplied size was zero, negative, not a number, or too large
    #[error("invalid {what}: {value}")]
    InvalidDimension { what: &'static str, value: f64 },
    /// An operation needs a desk and none exists
    #[error("create a desk first")]
    NoSurface,
    /// Adding an object needs a catalog item to be selected
    #[error("select an item from the catalog first")]
    NoSelection,
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecord),
    /// Storage or auth I/O failed; carries the upstream message
    #[error("{0}")]
    Transport(String),
    /// A storage backend that needs an account was used while signed out
    #[error("not signed in")]
    NotSignedIn,
}

impl EditorError {
    /// Check that a dimension is finite and strictly positive
    pub fn check_dimension(what: &'static str, value: f64) -> Result<f64, EditorError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(EditorError::InvalidDimension { what, value })
        }
    }

    /// Like [`Self::check_dimension`], with an upper limit
    pub fn check_dimension_at_most(what: &'static str, value: f64, max: f64) -> Result<f64, EditorError> {
        let value = Self::check_dimension(what, value)?;
        if value > max {
            return Err(EditorError::InvalidDimension { what, value });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimension() {
        assert_eq!(EditorError::check_dimension("width", 1.2), Ok(1.2));
        assert!(EditorError::check_dimension("width", 0.0).is_err());
        assert!(EditorError::check_dimension("width", -3.0).is_err());
        assert!(EditorError::check_dimension("width", f64::NAN).is_err());
    }

    #[test]
    fn test_check_dimension_at_most() {
        assert_eq!(EditorError::check_dimension_at_most("width", 2.0, 2.0), Ok(2.0));
        assert!(matches!(
            EditorError::check_dimension_at_most("width", 2.5, 2.0),
            Err(EditorError::InvalidDimension { what: "width", .. })
        ));
        assert!(EditorError::check_dimension_at_most("width", 0.0, 2.0).is_err());
    }

    #[test]
    fn test_malformed_converts() {
        let err: EditorError = MalformedRecord("missing desk".into()).into();
        assert!(err.to_string().contains("missing desk"));
    }
}
