//! # troom-signing — Signature Collection Ledger
//!
//! Tracks who has been asked to sign each transaction document and who has
//! actually signed.
//!
//! ## Modules
//!
//! - **Request** (`request.rs`): the [`SignatureRequest`] record, the
//!   [`SigningEligibility`] verdict, and [`SigningError`].
//!
//! - **Ledger** (`ledger.rs`): the thread-safe [`SignatureLedger`] —
//!   request issuance, eligibility queries, signature and rejection
//!   marking, and completion tracking.
//!
//! ## Ledger Rules
//!
//! - At most one request per (document, signer) pair, ever.
//! - Requests are never deleted; rejection and fulfillment mutate the
//!   request in place.
//! - A signer fulfills a request at most once.
//!
//! The ledger knows nothing about document statuses. Whether a document is
//! currently accepting signatures is the document state machine's call;
//! the ledger only answers who may sign and who already has.

pub mod ledger;
pub mod request;

// ─── Request re-exports ──────────────────────────────────────────────

pub use request::{SignatureRequest, SigningEligibility, SigningError};

// ─── Ledger re-exports ───────────────────────────────────────────────

pub use ledger::SignatureLedger;
