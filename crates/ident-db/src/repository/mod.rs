//! # Repository Module
//!
//! Database repository implementations for the ident store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CodeIssuer (issuer.rs)                                                │
//! │       │                                                                 │
//! │       │  db.sequence().next_reference()                                │
//! │       │  db.issuances().append(&record)                                │
//! │       ▼                                                                 │
//! │  SequenceRepository              IssuanceRepository                    │
//! │  ├── peek()                      ├── exists(sku)                       │
//! │  └── next_reference()            ├── get_by_sku(sku)                   │
//! │                                  ├── append(record)                    │
//! │                                  ├── list() / list_by_sku(sku)         │
//! │                                  └── count()                           │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  sequence_state                   issuance_records                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SequenceRepository`](sequence::SequenceRepository) - Item reference counter
//! - [`IssuanceRepository`](issuance::IssuanceRepository) - Append-only issuance log

pub mod issuance;
pub mod sequence;
