//! # troom-docflow — Document Lifecycle Orchestration
//!
//! The orchestration layer of the transaction room: one service that walks
//! property-transaction documents from template materialization through
//! edition, signature collection, and archiving.
//!
//! - **Service** ([`service`]): [`DocumentFlowService`], the single entry
//!   point. Every mutating operation runs under the target document's entry
//!   write lock, so transitions are TOCTOU-free per document.
//!
//! - **Access** ([`access`]): the [`TransactionAccess`] seam resolving
//!   logged-in users to transaction participants, with a deterministic
//!   in-memory mock backend.
//!
//! - **Storage** ([`storage`]): the [`FileStore`] seam for document content
//!   (copy on materialization, replace on edit and sign, time-limited view
//!   URLs).
//!
//! - **Notifications** ([`notify`]): the [`SignatureNotifier`] seam.
//!   Fire-and-forget; delivery failures are logged, never propagated.
//!
//! - **Errors** ([`error`]): [`DocflowError`] plus the coarse
//!   [`ErrorClass`] the hosting boundary maps onto its own status codes.
//!
//! - **Config** ([`config`]): [`DocflowConfig`], constructible from the
//!   environment.

pub mod access;
pub mod config;
pub mod error;
pub mod notify;
pub mod service;
pub mod storage;

// Re-export primary types.
pub use access::{
    AccessError, MockTransactionAccess, Participant, ParticipantRole, TransactionAccess,
    TransactionGrant, TransactionSummary,
};
pub use config::{DocflowConfig, DEFAULT_SECURE_URL_EXPIRY_HOURS};
pub use error::{DocflowError, ErrorClass};
pub use notify::{
    FailingNotifier, NoopNotifier, NotifierEvent, NotifyError, RecordingNotifier,
    SignatureNotifier,
};
pub use service::{DocumentFlowService, DocumentProjection, DocumentTemplate};
pub use storage::{DocumentFile, FileStore, InMemoryFileStore, StorageError};
