//! Property-based tests for code encoding.
//!
//! Run with: `cargo test -p ident-core --test proptest_tests`

use ident_core::checksum::{check_digit, verify};
use ident_core::encoder::encode;
use ident_core::{CodeType, ValidationError};
use proptest::prelude::*;

fn digits(min: usize, max: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(0u8..10, min..=max)
        .prop_map(|v| v.into_iter().map(|d| char::from(b'0' + d)).collect())
}

fn reference() -> impl Strategy<Value = String> {
    (10_000u64..100_000_000).prop_map(|r| r.to_string())
}

proptest! {
    #[test]
    fn check_digit_is_a_single_decimal_digit(body in digits(0, 40)) {
        let c = check_digit(&body).unwrap();
        prop_assert!(c.is_ascii_digit());
        prop_assert_eq!(check_digit(&body.clone()).unwrap(), c);
    }

    #[test]
    fn leading_zeros_do_not_change_check_digit(body in digits(1, 20), zeros in 0usize..6) {
        let padded = format!("{}{}", "0".repeat(zeros), body);
        prop_assert_eq!(check_digit(&padded).unwrap(), check_digit(&body).unwrap());
    }

    #[test]
    fn gtin13_is_always_13_valid_digits(prefix in digits(1, 17), reference in reference()) {
        let code = encode(CodeType::Gtin13, &prefix, None, &reference).unwrap();
        prop_assert_eq!(code.len(), 13);
        prop_assert!(code.chars().all(|c| c.is_ascii_digit()));
        prop_assert!(verify(&code));
    }

    #[test]
    fn gtin14_is_always_14_valid_digits(
        prefix in digits(1, 17),
        reference in reference(),
        indicator in proptest::option::of(0u8..10),
    ) {
        let indicator = indicator.map(|d| d.to_string());
        let code = encode(CodeType::Gtin14, &prefix, indicator.as_deref(), &reference).unwrap();
        prop_assert_eq!(code.len(), 14);
        prop_assert!(verify(&code));
    }

    #[test]
    fn gmn_and_udi_di_pad_or_reject(prefix in digits(1, 17), reference in reference()) {
        for code_type in [CodeType::Gmn, CodeType::UdiDi] {
            let body_len = prefix.len() + reference.len();
            match encode(code_type, &prefix, None, &reference) {
                Ok(code) => {
                    prop_assert!(body_len <= code_type.code_len());
                    prop_assert_eq!(code.len(), code_type.code_len());
                    let body = format!("{prefix}{reference}");
                    prop_assert!(code.starts_with(&body));
                }
                Err(ValidationError::Oversized { len, max, .. }) => {
                    prop_assert_eq!(len, body_len);
                    prop_assert!(len > max);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn encoding_is_deterministic(prefix in digits(1, 9), reference in reference()) {
        for code_type in CodeType::ALL {
            prop_assert_eq!(
                encode(code_type, &prefix, Some("1"), &reference),
                encode(code_type, &prefix, Some("1"), &reference)
            );
        }
    }
}
