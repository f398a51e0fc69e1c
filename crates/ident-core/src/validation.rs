//! # Validation Module
//!
//! Request validation for the issue path.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (ident-api)                                             │
//! │  └── JSON shape (deserialization)                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── code_type is one of the four supported types                      │
//! │  ├── sku / prefix / indicator shape                                    │
//! │  └── Runs BEFORE a reference is allocated                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── UNIQUE(sku), UNIQUE(item_reference)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ident_core::validation::validate_generate_request;
//! use ident_core::{CodeType, GenerateRequest};
//!
//! let order = validate_generate_request(&GenerateRequest {
//!     code_type: "GTIN-14".to_string(),
//!     prefix: "614141".to_string(),
//!     sku: "CASE-12".to_string(),
//!     indicator: None,
//! })
//! .unwrap();
//!
//! assert_eq!(order.code_type, CodeType::Gtin14);
//! assert_eq!(order.indicator.as_deref(), Some("0"));
//! ```

use crate::encoder::resolve_indicator;
use crate::error::{CoreResult, ValidationError};
use crate::{CodeType, GenerateRequest, IssueOrder, MAX_PREFIX_LEN, MAX_SKU_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a raw request and resolves it into an [`IssueOrder`].
///
/// The code type is checked first, so an unknown type is always reported
/// as `InvalidCodeType` regardless of the other fields.
pub fn validate_generate_request(req: &GenerateRequest) -> CoreResult<IssueOrder> {
    let code_type: CodeType = req.code_type.parse()?;

    let sku = validate_sku(&req.sku)?;
    validate_prefix(&req.prefix, code_type)?;

    let indicator = if code_type.uses_indicator() {
        let raw = req.indicator.as_deref();
        if let Some(i) = raw.filter(|i| !i.is_empty()) {
            validate_indicator(i)?;
        }
        Some(resolve_indicator(raw).to_string())
    } else {
        None
    };

    Ok(IssueOrder {
        code_type,
        prefix: req.prefix.clone(),
        sku,
        indicator,
    })
}

/// Validates a SKU and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
/// - No control characters
///
/// ## Example
/// ```rust
/// use ident_core::validation::validate_sku;
///
/// assert_eq!(validate_sku("  COKE-330 ").unwrap(), "COKE-330");
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<String> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if sku.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(sku.to_string())
}

/// Validates a vendor prefix for the given code type.
///
/// ## Rules
/// - Must not be empty
/// - At most 17 characters
/// - Digits only, except GMN which allows ASCII letters too
pub fn validate_prefix(prefix: &str, code_type: CodeType) -> ValidationResult<()> {
    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "prefix".to_string(),
        });
    }

    let ok = if code_type.numeric_prefix() {
        prefix.chars().all(|c| c.is_ascii_digit())
    } else {
        prefix.chars().all(|c| c.is_ascii_alphanumeric())
    };

    if !ok {
        let reason = if code_type.numeric_prefix() {
            format!("{code_type} prefix must contain only digits")
        } else {
            format!("{code_type} prefix must contain only letters and digits")
        };
        return Err(ValidationError::InvalidFormat {
            field: "prefix".to_string(),
            reason,
        });
    }

    // ASCII only from here, so bytes are characters
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(ValidationError::TooLong {
            field: "prefix".to_string(),
            max: MAX_PREFIX_LEN,
        });
    }

    Ok(())
}

/// Validates a GTIN-14 packaging indicator: exactly one digit.
pub fn validate_indicator(indicator: &str) -> ValidationResult<()> {
    let mut chars = indicator.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "indicator".to_string(),
            reason: "must be a single digit".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
