//! # ident-core: Pure Code Generation for Ident
//!
//! This crate turns a vendor prefix and an allocated item reference into a
//! finished product identification code. Everything here is a pure function:
//! the sequence counter and the record store live in `ident-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ident Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ident-api (HTTP)                             │   │
//! │  │    POST /generate ──► GET /history ──► GET /export             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ident-db (CodeIssuer, SQLite)                   │   │
//! │  │      sequence allocator • record store • serialized issue path  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ident-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌───────────┐  ┌──────────┐      │   │
//! │  │   │ checksum │  │ encoder  │  │validation │  │  export  │      │   │
//! │  │   │ mod-10   │  │ GTIN/GMN │  │ sku/prefix│  │ rows/CSV │      │   │
//! │  │   └──────────┘  └──────────┘  └───────────┘  └──────────┘      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CodeType, IssuanceRecord, GenerateRequest)
//! - [`checksum`] - Weighted modulo-10 check digit
//! - [`encoder`] - Type-specific padding/truncation rules
//! - [`validation`] - Request validation before any allocation happens
//! - [`export`] - Tabular export rows and CSV rendering
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ident_core::{encoder, CodeType};
//!
//! let code = encoder::encode(CodeType::Gtin13, "614141", None, "10000").unwrap();
//! assert_eq!(code.len(), 13);
//! assert!(code.starts_with("614141100000"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checksum;
pub mod encoder;
pub mod error;
pub mod export;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use export::ExportRow;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// First item reference handed out by a fresh sequence.
pub const INITIAL_REFERENCE: u64 = 10_000;

/// Indicator digit used for GTIN-14 when the request omits one.
pub const DEFAULT_INDICATOR: &str = "0";

/// Maximum SKU length accepted by validation.
pub const MAX_SKU_LEN: usize = 64;

/// Maximum vendor prefix length accepted by validation.
///
/// The longest code (GMN) is 18 characters and every reference has at
/// least five digits, so anything longer could never encode.
pub const MAX_PREFIX_LEN: usize = 17;
