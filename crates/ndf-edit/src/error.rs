//! Error types for NDF editing and schema validation.

use thiserror::Error;

use crate::model::ValueType;

/// Broad category of an [`EditError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A path did not resolve to an existing location.
    NotFound,
    /// A top-level name is already taken.
    Collision,
    /// No template is known for the requested type.
    MissingTemplate,
    /// The target location holds the wrong kind of value.
    TypeMismatch,
    /// The caller supplied structurally impossible input.
    InvalidInput,
}

impl ErrorKind {
    /// Returns a short stable label (e.g., "not-found").
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not-found",
            ErrorKind::Collision => "collision",
            ErrorKind::MissingTemplate => "missing-template",
            ErrorKind::TypeMismatch => "type-mismatch",
            ErrorKind::InvalidInput => "invalid-input",
        }
    }
}

/// Error returned by path mutations and additive operations.
///
/// Every variant is a refusal: the tree was left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("path {path:?} does not resolve on {object:?}")]
    NotFound { object: String, path: String },

    #[error("a top-level object named {name:?} already exists")]
    Collision { name: String },

    #[error("no template available for type {type_name:?}")]
    MissingTemplate { type_name: String },

    #[error("{path:?} holds a {actual:?} value, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: ValueType,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl EditError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditError::NotFound { .. } => ErrorKind::NotFound,
            EditError::Collision { .. } => ErrorKind::Collision,
            EditError::MissingTemplate { .. } => ErrorKind::MissingTemplate,
            EditError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EditError::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn not_found(object: impl Into<String>, path: impl Into<String>) -> Self {
        EditError::NotFound {
            object: object.into(),
            path: path.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EditError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Error during schema validation.
///
/// Only structurally impossible input is rejected; unfamiliar types,
/// properties and variants always pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("object has no type name")]
    MissingTypeName,

    #[error("property name is empty on type {type_name:?}")]
    EmptyPropertyName { type_name: String },
}

impl From<ValidationError> for EditError {
    fn from(err: ValidationError) -> Self {
        EditError::invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_labels() {
        let err = EditError::Collision { name: "Foo".to_string() };
        assert_eq!(err.kind(), ErrorKind::Collision);
        assert_eq!(err.kind().label(), "collision");
        assert_eq!(
            EditError::not_found("Unit", "A.B").kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let err: EditError = ValidationError::MissingTypeName.into();
        assert!(matches!(err, EditError::InvalidInput { .. }));
        assert!(err.to_string().contains("no type name"));
    }
}
