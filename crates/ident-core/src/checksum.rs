//! # Checksum Engine
//!
//! GS1 weighted modulo-10 check digit.
//!
//! ## Algorithm
//! ```text
//! digits:     6  1  4  1  4  1  1  0  0  0  0  0
//! position:  12 11 10  9  8  7  6  5  4  3  2  1   (1 = rightmost)
//! weight:     1  3  1  3  1  3  1  3  1  3  1  3
//!
//! total = 3 × (sum of odd positions) + (sum of even positions)
//! check = (10 - total mod 10) mod 10
//! ```

use crate::validation::ValidationResult;
use crate::ValidationError;

/// Computes the check digit for a string of decimal digits.
///
/// An empty input yields `'0'`. Any non-digit character is a contract
/// violation and is rejected with [`ValidationError::NonDigit`].
///
/// ## Example
/// ```rust
/// use ident_core::checksum::check_digit;
///
/// assert_eq!(check_digit("614141100000").unwrap(), '6');
/// assert_eq!(check_digit("000000000000").unwrap(), '0');
/// assert!(check_digit("61414A").is_err());
/// ```
pub fn check_digit(digits: &str) -> ValidationResult<char> {
    // Both sums are kept mod 10, so input length is unbounded.
    let mut odd_sum: u32 = 0;
    let mut even_sum: u32 = 0;

    for (i, c) in digits.chars().rev().enumerate() {
        let d = c
            .to_digit(10)
            .ok_or(ValidationError::NonDigit { found: c })?;
        // i is zero-based, so even i is an odd position
        if i % 2 == 0 {
            odd_sum = (odd_sum + d) % 10;
        } else {
            even_sum = (even_sum + d) % 10;
        }
    }

    let total = odd_sum * 3 + even_sum;
    let check = (10 - total % 10) % 10;

    // check is always 0..=9
    Ok(char::from(b'0' + check as u8))
}

/// Returns true if the last character of `code` is the correct check digit
/// for the characters before it.
pub fn verify(code: &str) -> bool {
    let Some(last) = code.chars().last() else {
        return false;
    };
    let body = &code[..code.len() - last.len_utf8()];
    matches!(check_digit(body), Ok(c) if c == last)
}
