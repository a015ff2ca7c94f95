//! # troom-core — Foundational Types for the Transaction Room Stack
//!
//! This crate is the bedrock of the troom stack. It defines the type-system
//! primitives shared by every other crate in the workspace; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `DocumentId`,
//!    `TransactionId`, `UserId`, `SignatureRequestId`, `TemplateId`,
//!    `Auth0Id` — all newtypes with validated constructors where the inner
//!    value has a shape to validate. No bare strings or UUIDs for
//!    identifiers.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Signature instants are legal-audit
//!    facts; two parties must never read a different moment out of the
//!    same record.
//!
//! 3. **Single `DocumentCategory` enum.** One closed set, exhaustive
//!    `match` everywhere. Adding a category forces every consumer to
//!    handle it at compile time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `troom-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod category;
pub mod error;
pub mod file;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use category::{DocumentCategory, DOCUMENT_CATEGORY_COUNT};
pub use error::ValidationError;
pub use file::FileRef;
pub use identity::{Auth0Id, DocumentId, SignatureRequestId, TemplateId, TransactionId, UserId};
pub use temporal::Timestamp;
