//! # Domain Types
//!
//! Core domain types used throughout Ident.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │ GenerateRequest │   │   IssuanceRecord    │   │    CodeType     │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  code_type (raw)│──►│  id (UUID)          │   │  GTIN-13        │   │
//! │  │  prefix         │   │  sku (unique)       │   │  GTIN-14        │   │
//! │  │  sku            │   │  item_reference     │   │  GMN            │   │
//! │  │  indicator?     │   │  generated_code     │   │  UDI-DI         │   │
//! │  └─────────────────┘   └─────────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every record has:
//! - `id`: UUID v4 - immutable storage key
//! - Business keys: `sku` and `item_reference`, both unique

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Code Type
// =============================================================================

/// The identification code formats this system can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum CodeType {
    /// 13-digit retail GTIN, prefix + reference, check digit.
    #[serde(rename = "GTIN-13")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "GTIN-13"))]
    Gtin13,
    /// 14-digit GTIN with a leading packaging indicator, check digit.
    #[serde(rename = "GTIN-14")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "GTIN-14"))]
    Gtin14,
    /// 18-character Global Model Number, no check digit.
    #[serde(rename = "GMN")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "GMN"))]
    Gmn,
    /// 14-character device identifier, no check digit.
    #[serde(rename = "UDI-DI")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "UDI-DI"))]
    UdiDi,
}

impl CodeType {
    /// Every supported code type, in display order.
    pub const ALL: [CodeType; 4] = [
        CodeType::Gtin13,
        CodeType::Gtin14,
        CodeType::Gmn,
        CodeType::UdiDi,
    ];

    /// Returns the wire/storage name (e.g. `"GTIN-13"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            CodeType::Gtin13 => "GTIN-13",
            CodeType::Gtin14 => "GTIN-14",
            CodeType::Gmn => "GMN",
            CodeType::UdiDi => "UDI-DI",
        }
    }

    /// Total length of an encoded code of this type.
    pub const fn code_len(&self) -> usize {
        match self {
            CodeType::Gtin13 => 13,
            CodeType::Gtin14 => 14,
            CodeType::Gmn => 18,
            CodeType::UdiDi => 14,
        }
    }

    /// Whether the last character is a computed check digit.
    pub const fn has_check_digit(&self) -> bool {
        matches!(self, CodeType::Gtin13 | CodeType::Gtin14)
    }

    /// Whether the type carries a packaging indicator.
    pub const fn uses_indicator(&self) -> bool {
        matches!(self, CodeType::Gtin14)
    }

    /// Whether the prefix must be purely numeric.
    ///
    /// GMN allows alphanumeric model numbers; the GTIN family and
    /// UDI-DI are numeric keys.
    pub const fn numeric_prefix(&self) -> bool {
        !matches!(self, CodeType::Gmn)
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::InvalidCodeType(s.to_string()))
    }
}

// =============================================================================
// Generate Request
// =============================================================================

/// A raw code generation request, as received from a client.
///
/// `code_type` stays a plain string here so an unknown type is reported as
/// [`CoreError::InvalidCodeType`] by validation instead of failing
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerateRequest {
    pub code_type: String,
    pub prefix: String,
    pub sku: String,
    #[serde(default)]
    pub indicator: Option<String>,
}

/// A validated request, ready for the issue path.
///
/// `indicator` is already resolved: `Some` (defaulting to `"0"`) for
/// GTIN-14, `None` for every other type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOrder {
    pub code_type: CodeType,
    pub prefix: String,
    pub sku: String,
    pub indicator: Option<String>,
}

// =============================================================================
// Issuance Record
// =============================================================================

/// One issued code. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IssuanceRecord {
    /// Storage key (UUID v4).
    pub id: String,

    pub code_type: CodeType,

    /// Vendor-supplied prefix.
    pub prefix: String,

    /// Stock Keeping Unit - unique across all records.
    pub sku: String,

    /// Packaging indicator digit, present only for GTIN-14.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,

    /// Allocated sequence value, decimal without leading zeros.
    pub item_reference: String,

    /// The final code string.
    pub generated_code: String,

    /// When the record was issued.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl IssuanceRecord {
    /// Builds a record for a freshly encoded code.
    pub fn new(
        id: impl Into<String>,
        order: &IssueOrder,
        item_reference: impl Into<String>,
        generated_code: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        IssuanceRecord {
            id: id.into(),
            code_type: order.code_type,
            prefix: order.prefix.clone(),
            sku: order.sku.clone(),
            indicator: order.indicator.clone(),
            item_reference: item_reference.into(),
            generated_code: generated_code.into(),
            created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
