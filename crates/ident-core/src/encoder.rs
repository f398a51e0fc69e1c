//! # Code Encoder
//!
//! Builds the final code string from a prefix and an allocated reference.
//!
//! ## Rules by Code Type
//! ```text
//! ┌──────────┬──────────────────────────────┬──────────────┬──────────┐
//! │ Type     │ Body                         │ Field        │ Check    │
//! ├──────────┼──────────────────────────────┼──────────────┼──────────┤
//! │ GTIN-13  │ prefix + ref                 │ 12, cut/pad→ │ yes (13) │
//! │ GTIN-14  │ indicator + prefix + ref     │ 13, cut/←pad │ yes (14) │
//! │ GMN      │ prefix + ref                 │ 18, pad→     │ no       │
//! │ UDI-DI   │ prefix + ref                 │ 14, pad→     │ no       │
//! └──────────┴──────────────────────────────┴──────────────┴──────────┘
//! ```
//!
//! GTIN bodies are truncated to the field width before the check digit is
//! appended. GMN and UDI-DI bodies are never truncated: an oversized body is
//! rejected with [`ValidationError::Oversized`].

use crate::checksum::check_digit;
use crate::validation::ValidationResult;
use crate::{CodeType, ValidationError, DEFAULT_INDICATOR};

/// Encodes a code. Pure: same inputs, same output, no side effects.
///
/// `indicator` is only read for GTIN-14; `None` or an empty string
/// resolve to `"0"`.
///
/// ## Example
/// ```rust
/// use ident_core::{encoder::encode, CodeType};
///
/// assert_eq!(encode(CodeType::Gtin13, "614141", None, "10000").unwrap(), "6141411000006");
/// assert_eq!(encode(CodeType::Gtin14, "01234", Some("1"), "10000").unwrap(), "00101234100006");
/// assert_eq!(encode(CodeType::UdiDi, "0861", None, "10000").unwrap(), "08611000000000");
/// ```
pub fn encode(
    code_type: CodeType,
    prefix: &str,
    indicator: Option<&str>,
    reference: &str,
) -> ValidationResult<String> {
    let body = match code_type {
        CodeType::Gtin13 => fit_right(&format!("{prefix}{reference}"), 12),
        CodeType::Gtin14 => {
            let indicator = resolve_indicator(indicator);
            fit_left(&format!("{indicator}{prefix}{reference}"), 13)
        }
        CodeType::Gmn | CodeType::UdiDi => {
            let body = format!("{prefix}{reference}");
            let max = code_type.code_len();
            let len = body.chars().count();
            if len > max {
                return Err(ValidationError::Oversized {
                    code_type: code_type.to_string(),
                    len,
                    max,
                });
            }
            format!("{body:0<max$}")
        }
    };

    if code_type.has_check_digit() {
        with_check_digit(body)
    } else {
        Ok(body)
    }
}

/// Resolves the GTIN-14 indicator digit, defaulting to `"0"`.
pub fn resolve_indicator(indicator: Option<&str>) -> &str {
    match indicator {
        Some(i) if !i.is_empty() => i,
        _ => DEFAULT_INDICATOR,
    }
}

fn with_check_digit(body: String) -> ValidationResult<String> {
    let check = check_digit(&body)?;
    let mut code = body;
    code.push(check);
    Ok(code)
}

/// Keeps the first `width` characters, right-padding with '0'.
fn fit_right(body: &str, width: usize) -> String {
    let cut: String = body.chars().take(width).collect();
    format!("{cut:0<width$}")
}

/// Keeps the first `width` characters, left-padding with '0'.
fn fit_left(body: &str, width: usize) -> String {
    let cut: String = body.chars().take(width).collect();
    format!("{cut:0>width$}")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gtin13_pads_right_then_checks() {
        // "61414110000" is 11 digits → "614141100000"
        let code = encode(CodeType::Gtin13, "614141", None, "10000").unwrap();
        assert_eq!(code, "6141411000006");
    }

    #[test]
    fn test_gtin13_truncates_long_body() {
        // 9-digit prefix + 5-digit ref = 14 → first 12 kept
        let code = encode(CodeType::Gtin13, "629104150", None, "21000").unwrap();
        assert_eq!(&code[..12], "629104150210");
        assert_eq!(code.len(), 13);
        assert!(crate::checksum::verify(&code));
    }

    #[test]
    fn test_gtin14_pads_left() {
        let code = encode(CodeType::Gtin14, "01234", Some("1"), "10000").unwrap();
        assert_eq!(code, "00101234100006");
    }

    #[test]
    fn test_gtin14_default_indicator() {
        let with_none = encode(CodeType::Gtin14, "614141", None, "10000").unwrap();
        let with_empty = encode(CodeType::Gtin14, "614141", Some(""), "10000").unwrap();
        let with_zero = encode(CodeType::Gtin14, "614141", Some("0"), "10000").unwrap();
        assert_eq!(with_none, with_zero);
        assert_eq!(with_empty, with_zero);
        assert_eq!(with_zero.len(), 14);
    }

    #[test]
    fn test_gtin14_truncates_long_body() {
        let code = encode(CodeType::Gtin14, "0614141999", Some("5"), "123456").unwrap();
        assert_eq!(&code[..13], "5061414199912");
        assert!(crate::checksum::verify(&code));
    }

    #[test]
    fn test_indicator_ignored_for_other_types() {
        let a = encode(CodeType::Gtin13, "614141", Some("7"), "10000").unwrap();
        let b = encode(CodeType::Gtin13, "614141", None, "10000").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_gmn_pads_to_18_without_check_digit() {
        let code = encode(CodeType::Gmn, "4012AB", None, "10000").unwrap();
        assert_eq!(code, "4012AB100000000000");
        assert_eq!(code.len(), 18);
    }

    #[test]
    fn test_udi_di_pads_to_14() {
        let code = encode(CodeType::UdiDi, "0861", None, "10042").unwrap();
        assert_eq!(code, "08611004200000");
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        let code = encode(CodeType::UdiDi, "123456789", None, "10000").unwrap();
        assert_eq!(code, "12345678910000");
    }

    #[test]
    fn test_oversized_is_rejected_not_truncated() {
        let err = encode(CodeType::UdiDi, "1234567890", None, "10000").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Oversized {
                code_type: "UDI-DI".to_string(),
                len: 15,
                max: 14,
            }
        );

        let err = encode(CodeType::Gmn, "ABCDEFGHIJKLMN", None, "10000").unwrap_err();
        assert!(matches!(err, ValidationError::Oversized { max: 18, .. }));
    }

    #[test]
    fn test_code_length_and_check_digit_per_type() {
        for code_type in CodeType::ALL {
            let code = encode(code_type, "0861", Some("1"), "10000").unwrap();
            assert_eq!(code.chars().count(), code_type.code_len(), "{code_type}");
            if code_type.has_check_digit() {
                assert!(crate::checksum::verify(&code), "{code_type}");
            } else {
                assert!(code.ends_with("0000"), "{code_type}");
            }
        }
    }

    #[test]
    fn test_non_digit_gtin_prefix_is_format_error() {
        let err = encode(CodeType::Gtin13, "61A141", None, "10000").unwrap_err();
        assert_eq!(err, ValidationError::NonDigit { found: 'A' });
    }
}
