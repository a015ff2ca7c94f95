//! # Document Status Catalog & Behavior Map
//!
//! The closed set of document lifecycle statuses, the actions that move a
//! document between them, and the pure dispatch table that decides
//! legality.
//!
//! ## Lifecycle
//!
//! ```text
//! Pending ──▶ InEdition ──▶ AwaitingSignatures ──▶ Signed (terminal)
//!                ▲                   │
//!                │                   └──▶ Rejected
//!                └────────────────────────────┘
//!                       (correct_document)
//!
//! Pending / InEdition / AwaitingSignatures / Rejected ──▶ Archived (terminal)
//! ```
//!
//! [`apply_action`] is the single source of truth for transition legality.
//! The status predicates ([`DocumentStatus::is_editable`],
//! [`DocumentStatus::is_signable`]) and every service-level gate agree with
//! its table; no other code encodes transition knowledge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Document Status ─────────────────────────────────────────────────

/// Number of document statuses.
pub const DOCUMENT_STATUS_COUNT: usize = 6;

/// The lifecycle status of a transaction document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Freshly materialized from a template; content not yet reviewed.
    Pending,
    /// Under active editing by a transaction participant.
    InEdition,
    /// Content frozen for signing; signature requests may be issued.
    AwaitingSignatures,
    /// Every requested signature has been collected (terminal).
    Signed,
    /// A signer rejected the document; it must be corrected and re-issued.
    Rejected,
    /// Withdrawn from the transaction (terminal).
    Archived,
}

impl DocumentStatus {
    /// Canonical status name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InEdition => "IN_EDITION",
            Self::AwaitingSignatures => "AWAITING_SIGNATURES",
            Self::Signed => "SIGNED",
            Self::Rejected => "REJECTED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parse a canonical status name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PENDING" => Some(Self::Pending),
            "IN_EDITION" => Some(Self::InEdition),
            "AWAITING_SIGNATURES" => Some(Self::AwaitingSignatures),
            "SIGNED" => Some(Self::Signed),
            "REJECTED" => Some(Self::Rejected),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Whether document content may be modified in this status.
    ///
    /// True for `InEdition` and `Rejected`: a rejected document is edited
    /// in place to address the rejection reason before re-issuing.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::InEdition | Self::Rejected)
    }

    /// Whether signatures may be requested and collected in this status.
    ///
    /// True only for `AwaitingSignatures`.
    pub fn is_signable(&self) -> bool {
        matches!(self, Self::AwaitingSignatures)
    }

    /// Whether this status is terminal (no action leaves it).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Signed | Self::Archived)
    }

    /// All statuses, in lifecycle order.
    pub fn all_statuses() -> [DocumentStatus; DOCUMENT_STATUS_COUNT] {
        [
            Self::Pending,
            Self::InEdition,
            Self::AwaitingSignatures,
            Self::Signed,
            Self::Rejected,
            Self::Archived,
        ]
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Document Action ─────────────────────────────────────────────────

/// An action applied to a document's lifecycle status.
///
/// `Sign` carries the signature ledger's verdict: whether this signature
/// was the last outstanding one. The dispatch table uses it to decide
/// between completing the document and keeping it open for the remaining
/// signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentAction {
    /// Take a pending document into edition.
    CheckForEdit,
    /// Freeze edited content and open the document for signatures.
    ReadyForSigning,
    /// Return a rejected document to edition for rework.
    CorrectDocument,
    /// Record one collected signature.
    Sign {
        /// True when the signature ledger reports every request fulfilled.
        all_signatures_complete: bool,
    },
    /// A signer refused to sign.
    Reject,
    /// Withdraw the document from the transaction.
    Archive,
}

impl DocumentAction {
    /// Stable action name used in transition records and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckForEdit => "check_for_edit",
            Self::ReadyForSigning => "ready_for_signing",
            Self::CorrectDocument => "correct_document",
            Self::Sign { .. } => "sign",
            Self::Reject => "reject",
            Self::Archive => "archive",
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors that can occur during document status transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// Attempted action is not legal from the current status.
    #[error("invalid document transition: action '{action}' is not legal from status {from}")]
    InvalidTransition {
        /// Status the document was in when the action was attempted.
        from: DocumentStatus,
        /// Name of the attempted action.
        action: &'static str,
    },
}

// ─── Dispatch Table ──────────────────────────────────────────────────

/// Apply an action to a status, returning the resulting status.
///
/// This is the complete legality table. A `Sign` with outstanding
/// requests is a legal self-transition: the document stays
/// `AwaitingSignatures` until the last signature lands.
///
/// # Errors
///
/// Returns [`StatusError::InvalidTransition`] for every (status, action)
/// pair not in the table. `Signed` and `Archived` admit no actions.
pub fn apply_action(
    status: DocumentStatus,
    action: DocumentAction,
) -> Result<DocumentStatus, StatusError> {
    use DocumentAction as A;
    use DocumentStatus as S;

    match (status, action) {
        (S::Pending, A::CheckForEdit) => Ok(S::InEdition),
        (S::InEdition, A::ReadyForSigning) => Ok(S::AwaitingSignatures),
        (S::Rejected, A::CorrectDocument) => Ok(S::InEdition),
        (
            S::AwaitingSignatures,
            A::Sign {
                all_signatures_complete: true,
            },
        ) => Ok(S::Signed),
        (
            S::AwaitingSignatures,
            A::Sign {
                all_signatures_complete: false,
            },
        ) => Ok(S::AwaitingSignatures),
        (S::AwaitingSignatures, A::Reject) => Ok(S::Rejected),
        (
            S::Pending | S::InEdition | S::AwaitingSignatures | S::Rejected,
            A::Archive,
        ) => Ok(S::Archived),
        (from, action) => Err(StatusError::InvalidTransition {
            from,
            action: action.name(),
        }),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
