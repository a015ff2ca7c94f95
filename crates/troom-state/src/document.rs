//! # Document Record
//!
//! The document aggregate: identity, current status, file handle, and the
//! ordered log of status transitions.
//!
//! The only status mutator is [`Document::apply`], which delegates
//! legality to [`apply_action`]. Callers never write `status` directly,
//! so the record can never hold a status the dispatch table did not
//! produce.

use serde::{Deserialize, Serialize};

use troom_core::{DocumentCategory, DocumentId, FileRef, Timestamp, TransactionId, UserId};

use crate::status::{apply_action, DocumentAction, DocumentStatus, StatusError};

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a document status transition.
///
/// Legal self-transitions (an incomplete sign) are not recorded: the log
/// captures status *changes*, and a partial signature changes the ledger,
/// not the document status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTransitionRecord {
    /// Status before the transition.
    pub from_status: DocumentStatus,
    /// Status after the transition.
    pub to_status: DocumentStatus,
    /// Name of the action that caused the transition.
    pub action: String,
    /// Participant who initiated the transition, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<UserId>,
    /// When the transition occurred.
    pub timestamp: Timestamp,
}

// ─── Document ────────────────────────────────────────────────────────

/// A transaction document with its lifecycle status and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identity.
    pub document_id: DocumentId,
    /// The transaction this document belongs to.
    pub transaction_id: TransactionId,
    /// Human-readable title (e.g., "Purchase Agreement").
    pub title: String,
    /// Document category.
    pub category: DocumentCategory,
    /// Storage handle of the current document content.
    pub file: FileRef,
    /// Current lifecycle status.
    pub status: DocumentStatus,
    /// Ordered log of all status transitions.
    pub transitions: Vec<DocumentTransitionRecord>,
    /// When the document was materialized.
    pub created_at: Timestamp,
    /// When the document was last modified (content or status).
    pub updated_at: Timestamp,
}

impl Document {
    /// Create a new document in `Pending` status, as materialized from a
    /// template.
    pub fn new(
        document_id: DocumentId,
        transaction_id: TransactionId,
        title: String,
        category: DocumentCategory,
        file: FileRef,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            document_id,
            transaction_id,
            title,
            category,
            file,
            status: DocumentStatus::Pending,
            transitions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a lifecycle action, recording the transition.
    ///
    /// Delegates legality to [`apply_action`]. On success the status is
    /// updated and, when it actually changed, a [`DocumentTransitionRecord`]
    /// is appended. On failure nothing is modified.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::InvalidTransition`] when the action is not
    /// legal from the current status.
    pub fn apply(
        &mut self,
        action: DocumentAction,
        actor: Option<UserId>,
    ) -> Result<(), StatusError> {
        let to = apply_action(self.status, action)?;
        if to != self.status {
            self.transitions.push(DocumentTransitionRecord {
                from_status: self.status,
                to_status: to,
                action: action.name().to_string(),
                actor,
                timestamp: Timestamp::now(),
            });
            self.status = to;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Replace the stored content handle.
    ///
    /// Status is untouched; callers gate on [`Document::is_editable`] (or
    /// the signing path) before replacing content.
    pub fn replace_file(&mut self, file: FileRef) {
        self.file = file;
        self.updated_at = Timestamp::now();
    }

    /// Whether document content may currently be modified.
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Whether signatures may currently be requested and collected.
    pub fn is_signable(&self) -> bool {
        self.status.is_signable()
    }

    /// Whether the document is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_document() -> Document {
        Document::new(
            DocumentId::new(),
            TransactionId::new(),
            "Purchase Agreement".to_string(),
            DocumentCategory::Contract,
            FileRef::new("transactions/t-001/purchase-agreement.pdf").unwrap(),
        )
    }

    fn make_awaiting_document() -> Document {
        let mut doc = make_document();
        doc.apply(DocumentAction::CheckForEdit, None).unwrap();
        doc.apply(DocumentAction::ReadyForSigning, None).unwrap();
        doc
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn test_new_document_is_pending() {
        let doc = make_document();
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert!(doc.transitions.is_empty());
        assert!(!doc.is_editable());
        assert!(!doc.is_signable());
        assert!(!doc.is_terminal());
    }

    // ── Happy-path lifecycle tests ────────────────────────────────────

    #[test]
    fn test_check_for_edit() {
        let mut doc = make_document();
        doc.apply(DocumentAction::CheckForEdit, None).unwrap();
        assert_eq!(doc.status, DocumentStatus::InEdition);
        assert!(doc.is_editable());
        assert_eq!(doc.transitions.len(), 1);
    }

    #[test]
    fn test_ready_for_signing() {
        let doc = make_awaiting_document();
        assert_eq!(doc.status, DocumentStatus::AwaitingSignatures);
        assert!(doc.is_signable());
        assert!(!doc.is_editable());
    }

    #[test]
    fn test_partial_sign_keeps_awaiting_and_logs_nothing() {
        let mut doc = make_awaiting_document();
        let log_len = doc.transitions.len();
        doc.apply(
            DocumentAction::Sign {
                all_signatures_complete: false,
            },
            None,
        )
        .unwrap();
        assert_eq!(doc.status, DocumentStatus::AwaitingSignatures);
        assert_eq!(doc.transitions.len(), log_len);
    }

    #[test]
    fn test_final_sign_reaches_signed() {
        let mut doc = make_awaiting_document();
        doc.apply(
            DocumentAction::Sign {
                all_signatures_complete: true,
            },
            None,
        )
        .unwrap();
        assert_eq!(doc.status, DocumentStatus::Signed);
        assert!(doc.is_terminal());
    }

    #[test]
    fn test_reject_then_correct() {
        let mut doc = make_awaiting_document();
        doc.apply(DocumentAction::Reject, None).unwrap();
        assert_eq!(doc.status, DocumentStatus::Rejected);
        assert!(doc.is_editable());

        doc.apply(DocumentAction::CorrectDocument, None).unwrap();
        assert_eq!(doc.status, DocumentStatus::InEdition);
    }

    #[test]
    fn test_archive_from_pending() {
        let mut doc = make_document();
        doc.apply(DocumentAction::Archive, None).unwrap();
        assert_eq!(doc.status, DocumentStatus::Archived);
        assert!(doc.is_terminal());
    }

    // ── Full lifecycle test ──────────────────────────────────────────

    #[test]
    fn test_full_lifecycle_with_rejection_loop() {
        let mut doc = make_document();
        doc.apply(DocumentAction::CheckForEdit, None).unwrap();
        doc.apply(DocumentAction::ReadyForSigning, None).unwrap();
        doc.apply(DocumentAction::Reject, None).unwrap();
        doc.apply(DocumentAction::CorrectDocument, None).unwrap();
        doc.apply(DocumentAction::ReadyForSigning, None).unwrap();
        doc.apply(
            DocumentAction::Sign {
                all_signatures_complete: true,
            },
            None,
        )
        .unwrap();

        assert_eq!(doc.status, DocumentStatus::Signed);
        assert_eq!(doc.transitions.len(), 6);

        // Log is contiguous: each record starts where the previous ended.
        for pair in doc.transitions.windows(2) {
            assert_eq!(pair[0].to_status, pair[1].from_status);
        }
    }

    // ── Invalid transition tests ─────────────────────────────────────

    #[test]
    fn test_illegal_action_leaves_document_untouched() {
        let mut doc = make_document();
        let before_status = doc.status;
        let result = doc.apply(DocumentAction::Reject, None);
        assert!(result.is_err());
        assert_eq!(doc.status, before_status);
        assert!(doc.transitions.is_empty());
    }

    #[test]
    fn test_signed_document_rejects_everything() {
        let mut doc = make_awaiting_document();
        doc.apply(
            DocumentAction::Sign {
                all_signatures_complete: true,
            },
            None,
        )
        .unwrap();

        assert!(doc.apply(DocumentAction::Archive, None).is_err());
        assert!(doc.apply(DocumentAction::CheckForEdit, None).is_err());
        assert!(doc.apply(DocumentAction::Reject, None).is_err());
    }

    // ── Transition log contents ──────────────────────────────────────

    #[test]
    fn test_transition_record_fields() {
        let actor = UserId::new();
        let mut doc = make_document();
        doc.apply(DocumentAction::CheckForEdit, Some(actor.clone()))
            .unwrap();

        let record = &doc.transitions[0];
        assert_eq!(record.from_status, DocumentStatus::Pending);
        assert_eq!(record.to_status, DocumentStatus::InEdition);
        assert_eq!(record.action, "check_for_edit");
        assert_eq!(record.actor, Some(actor));
    }

    #[test]
    fn test_transition_without_actor() {
        let mut doc = make_document();
        doc.apply(DocumentAction::CheckForEdit, None).unwrap();
        assert_eq!(doc.transitions[0].actor, None);
    }

    // ── Content replacement ──────────────────────────────────────────

    #[test]
    fn test_replace_file() {
        let mut doc = make_document();
        let new_file = FileRef::new("transactions/t-001/purchase-agreement-v2.pdf").unwrap();
        doc.replace_file(new_file.clone());
        assert_eq!(doc.file, new_file);
        assert!(doc.updated_at >= doc.created_at);
    }

    // ── Serialization tests ──────────────────────────────────────────

    #[test]
    fn test_document_serialization() {
        let mut doc = make_awaiting_document();
        doc.apply(DocumentAction::Reject, Some(UserId::new())).unwrap();

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, doc.status);
        assert_eq!(parsed.document_id, doc.document_id);
        assert_eq!(parsed.transitions.len(), doc.transitions.len());
    }

    #[test]
    fn test_actor_omitted_from_json_when_absent() {
        let mut doc = make_document();
        doc.apply(DocumentAction::CheckForEdit, None).unwrap();
        let json = serde_json::to_string(&doc.transitions[0]).unwrap();
        assert!(!json.contains("actor"));
    }
}
