//! # troom-state — Document Lifecycle State Machine
//!
//! Implements the status catalog and transition rules for transaction
//! documents.
//!
//! ## Modules
//!
//! - **Status** (`status.rs`): [`DocumentStatus`], [`DocumentAction`], and
//!   the pure dispatch table [`apply_action`] that decides which action is
//!   legal from which status.
//!
//! - **Document** (`document.rs`): the [`Document`] record — identity,
//!   current status, file handle, and the ordered transition log. Its
//!   [`Document::apply`] method is the only status mutator.
//!
//! ## Design
//!
//! The state machine is a runtime-validated enum rather than a typestate
//! encoding. Documents are hydrated from persistence with an arbitrary
//! current status, and the same action (`archive`) is legal from four
//! different statuses; both rule out encoding the status in the type.
//! Every legality decision funnels through [`apply_action`], so the
//! transition table exists in exactly one place.

pub mod document;
pub mod status;

// ─── Status re-exports ───────────────────────────────────────────────

pub use status::{apply_action, DocumentAction, DocumentStatus, StatusError, DOCUMENT_STATUS_COUNT};

// ─── Document re-exports ─────────────────────────────────────────────

pub use document::{Document, DocumentTransitionRecord};
