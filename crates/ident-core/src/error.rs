//! # Error Types
//!
//! Domain-specific error types for ident-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ident-core errors (this file)                                         │
//! │  ├── CoreError        - Issuance rule violations                       │
//! │  └── ValidationError  - Malformed input (the "format error" family)    │
//! │                                                                         │
//! │  ident-db errors (separate crate)                                      │
//! │  ├── DbError          - Store read/write/corrupt failures              │
//! │  └── IssueError       - What CodeIssuer callers see                    │
//! │                                                                         │
//! │  ident-api errors (in app)                                             │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → IssueError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Issuance rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested code type is not one of GTIN-13, GTIN-14, GMN, UDI-DI.
    #[error("Invalid code_type: '{0}'")]
    InvalidCodeType(String),

    /// The SKU already has an issued code.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /generate { sku: "COKE-330", ... }
    ///      │
    ///      ▼
    /// Record store lookup: COKE-330 → 6141411000006
    ///      │
    ///      ▼
    /// DuplicateSku { sku: "COKE-330", existing_code: "6141411000006" }
    ///      │
    ///      ▼
    /// Client shows: "SKU 'COKE-330' already has code: 6141411000006"
    /// ```
    #[error("SKU '{sku}' already has code: {existing_code}")]
    DuplicateSku { sku: String, existing_code: String },

    /// No issuance record exists for the SKU.
    #[error("SKU not found: {0}")]
    SkuNotFound(String),

    /// Input failed validation (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are the format errors of the issue path. They are raised before a
/// reference is allocated, except for [`ValidationError::NonDigit`], which the
/// checksum engine raises as a contract check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A checksum input contained a non-digit character.
    #[error("check digit input must be decimal digits, found '{found}'")]
    NonDigit { found: char },

    /// Encoded value would not fit the fixed code width.
    #[error("{code_type} input is {len} characters, exceeds the {max}-character code")]
    Oversized {
        code_type: String,
        len: usize,
        max: usize,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_sku_message_carries_existing_code() {
        let err = CoreError::DuplicateSku {
            sku: "COKE-330".to_string(),
            existing_code: "6141411000006".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "SKU 'COKE-330' already has code: 6141411000006"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::Oversized {
            code_type: "UDI-DI".to_string(),
            len: 16,
            max: 14,
        };
        assert_eq!(
            err.to_string(),
            "UDI-DI input is 16 characters, exceeds the 14-character code"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::NonDigit { found: 'x' };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
