//! # Document Flow Service
//!
//! Single entry point for the document lifecycle of a property transaction:
//! materializing documents from templates, the edit loop, and the
//! signature-collection protocol.
//!
//! Documents live in a `DashMap`; every mutating operation runs under the
//! target document's entry write lock, so read-validate-update is serialized
//! per document while operations on distinct documents proceed in parallel.
//! Each operation follows the same sequence: authorize, probe transition
//! legality before any side effect, apply side effects (storage, ledger),
//! then commit the status through [`Document::apply`].
//!
//! Collaborators are consumed behind `Arc<dyn ...>`. Notifications are
//! fire-and-forget: a delivery failure is logged at `warn` and never fails
//! the operation that emitted it.

use std::sync::Arc;

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use troom_core::{
    Auth0Id, DocumentCategory, DocumentId, FileRef, TemplateId, Timestamp, TransactionId, UserId,
};
use troom_signing::{SignatureLedger, SignatureRequest};
use troom_state::{apply_action, Document, DocumentAction, DocumentStatus};

use crate::access::TransactionAccess;
use crate::config::DocflowConfig;
use crate::error::DocflowError;
use crate::notify::SignatureNotifier;
use crate::storage::{DocumentFile, FileStore};

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// A registered document template, the source a working document is
/// materialized from.
///
/// Template authoring and versioning live outside this crate; the service
/// only needs the identity, the descriptive fields every materialized copy
/// inherits, and the storage handle to clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTemplate {
    /// Template identity.
    pub template_id: TemplateId,
    /// Title inherited by materialized documents.
    pub title: String,
    /// Category inherited by materialized documents.
    pub category: DocumentCategory,
    /// Storage handle of the template content.
    pub file: FileRef,
}

/// Read-side document shape handed to callers.
///
/// Flags are derived from the status at projection time, so they can never
/// disagree with it. `could_be_requested_for_signature` and `is_signable`
/// coincide under the current transition table; both are exposed because
/// callers gate different affordances on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentProjection {
    pub document_id: DocumentId,
    pub transaction_id: TransactionId,
    pub title: String,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
    pub is_editable: bool,
    pub is_signable: bool,
    pub could_be_requested_for_signature: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Document> for DocumentProjection {
    fn from(doc: &Document) -> Self {
        Self {
            document_id: doc.document_id.clone(),
            transaction_id: doc.transaction_id.clone(),
            title: doc.title.clone(),
            category: doc.category,
            status: doc.status,
            is_editable: doc.is_editable(),
            is_signable: doc.is_signable(),
            could_be_requested_for_signature: doc.is_signable(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Document Flow Service
// ---------------------------------------------------------------------------

/// In-memory document lifecycle orchestrator.
///
/// Thread-safe via `DashMap`. Holding the document's entry write lock for
/// the whole read-validate-update sequence makes every status transition
/// TOCTOU-free; the signature ledger takes its own per-document entry lock
/// and never locks documents, so lock order is always document → ledger.
pub struct DocumentFlowService {
    documents: DashMap<DocumentId, Document>,
    templates: DashMap<TemplateId, DocumentTemplate>,
    ledger: SignatureLedger,
    access: Arc<dyn TransactionAccess>,
    files: Arc<dyn FileStore>,
    notifier: Arc<dyn SignatureNotifier>,
    config: DocflowConfig,
}

impl DocumentFlowService {
    /// Create an empty service wired to the given collaborators.
    pub fn new(
        access: Arc<dyn TransactionAccess>,
        files: Arc<dyn FileStore>,
        notifier: Arc<dyn SignatureNotifier>,
        config: DocflowConfig,
    ) -> Self {
        Self {
            documents: DashMap::new(),
            templates: DashMap::new(),
            ledger: SignatureLedger::new(),
            access,
            files,
            notifier,
            config,
        }
    }

    /// Register a template for later materialization.
    pub fn register_template(&self, template: DocumentTemplate) {
        self.templates
            .insert(template.template_id.clone(), template);
    }

    /// Materialize a new document from a registered template.
    ///
    /// The template's file is cloned into a fresh working copy, so edits to
    /// the document never touch the template. The document starts `Pending`.
    ///
    /// # Errors
    ///
    /// Access errors from authorization;
    /// [`DocflowError::DocumentTemplateNotFound`] for an unregistered
    /// template; storage errors from the copy.
    pub fn create_document_from_template(
        &self,
        transaction_id: &TransactionId,
        template_id: &TemplateId,
        user_auth0_id: &Auth0Id,
    ) -> Result<DocumentProjection, DocflowError> {
        self.access
            .verify_user_can_access_transaction(transaction_id, user_auth0_id)?;

        let template = self
            .templates
            .get(template_id)
            .map(|t| t.value().clone())
            .ok_or_else(|| DocflowError::DocumentTemplateNotFound {
                template_id: template_id.clone(),
            })?;

        let file = self.files.duplicate_file(&template.file)?;

        let document = Document::new(
            DocumentId::new(),
            transaction_id.clone(),
            template.title,
            template.category,
            file,
        );
        let projection = DocumentProjection::from(&document);
        self.documents
            .insert(document.document_id.clone(), document);
        Ok(projection)
    }

    /// Open a document for edition.
    ///
    /// A `Pending` document moves to `InEdition`; any other status is left
    /// as it is and reported back through the projection flags, so callers
    /// can always ask "may I edit this?" without first asking the status.
    pub fn check_document_for_edit(
        &self,
        user_auth0_id: &Auth0Id,
        document_id: &DocumentId,
        transaction_id: &TransactionId,
    ) -> Result<DocumentProjection, DocflowError> {
        let grant = self
            .access
            .verify_user_can_access_transaction(transaction_id, user_auth0_id)?;

        let mut entry = self.locked_document(document_id, transaction_id)?;
        let doc = entry.value_mut();

        if doc.status == DocumentStatus::Pending {
            doc.apply(
                DocumentAction::CheckForEdit,
                Some(grant.participant.user_id),
            )?;
        }
        Ok(DocumentProjection::from(&*doc))
    }

    /// Replace a document's content with an uploaded revision.
    ///
    /// With `mark_ready_for_signing` set, the document moves to
    /// `AwaitingSignatures` after the content is stored. That transition is
    /// probed before storage is touched: an upload that could not legally
    /// move the document is rejected with nothing written.
    ///
    /// # Errors
    ///
    /// [`DocflowError::InvalidStatusTransition`] with action `"edit"` when
    /// the document is not editable, or with action `"ready_for_signing"`
    /// when the flag is set and that transition is illegal; access and
    /// storage errors from the collaborators.
    pub fn edit_document(
        &self,
        transaction_id: &TransactionId,
        document_id: &DocumentId,
        user_auth0_id: &Auth0Id,
        file: DocumentFile,
        mark_ready_for_signing: bool,
    ) -> Result<DocumentProjection, DocflowError> {
        let grant = self
            .access
            .verify_user_can_access_transaction(transaction_id, user_auth0_id)?;

        let mut entry = self.locked_document(document_id, transaction_id)?;
        let doc = entry.value_mut();

        if !doc.is_editable() {
            return Err(DocflowError::InvalidStatusTransition {
                from: doc.status,
                action: "edit",
            });
        }
        if mark_ready_for_signing {
            apply_action(doc.status, DocumentAction::ReadyForSigning)?;
        }

        let new_path = self.files.replace_document(&file, &doc.file)?;
        doc.replace_file(new_path);

        if mark_ready_for_signing {
            doc.apply(
                DocumentAction::ReadyForSigning,
                Some(grant.participant.user_id),
            )?;
        }
        Ok(DocumentProjection::from(&*doc))
    }

    /// Ask a participant to sign a document that is collecting signatures.
    ///
    /// The signer is notified; a delivery failure is logged and the request
    /// stands.
    ///
    /// # Errors
    ///
    /// [`DocflowError::DocumentNotReadyForSignatures`] unless the document
    /// is `AwaitingSignatures`; [`DocflowError::UserNotInTransaction`] when
    /// the nominated signer is not a declared participant;
    /// [`troom_signing::SigningError::SignatureAlreadyRequested`] when this
    /// signer was already asked.
    pub fn request_sign(
        &self,
        agent_auth0_id: &Auth0Id,
        transaction_id: &TransactionId,
        document_id: &DocumentId,
        signer_user_id: &UserId,
    ) -> Result<SignatureRequest, DocflowError> {
        self.access
            .verify_user_can_access_transaction(transaction_id, agent_auth0_id)?;

        let entry = self.locked_document(document_id, transaction_id)?;
        let doc = entry.value();

        if !doc.is_signable() {
            return Err(DocflowError::DocumentNotReadyForSignatures {
                document_id: document_id.clone(),
                status: doc.status,
            });
        }

        let signer = self
            .access
            .find_participant(transaction_id, signer_user_id)?
            .ok_or_else(|| DocflowError::UserNotInTransaction {
                transaction_id: transaction_id.clone(),
                user_id: signer_user_id.clone(),
            })?;

        let request = self
            .ledger
            .request_signature(document_id.clone(), signer.user_id)?;

        if let Err(e) = self.notifier.signature_requested(&request, doc) {
            tracing::warn!(
                error = %e,
                document_id = %document_id,
                signer_id = %request.signer_id,
                "signature request notification failed"
            );
        }
        Ok(request)
    }

    /// Collect one participant's signature, uploading the signed content.
    ///
    /// The ledger and the status are both consulted before anything is
    /// stored. The document moves to `Signed` only when this signature was
    /// the last outstanding one; otherwise it keeps collecting.
    ///
    /// # Errors
    ///
    /// [`troom_signing::SigningError::UserCannotSign`] without a pending
    /// request, [`troom_signing::SigningError::DocumentAlreadySigned`] for
    /// a fulfilled one; [`DocflowError::InvalidStatusTransition`] unless
    /// the document is `AwaitingSignatures`; storage errors from the upload.
    pub fn sign_document(
        &self,
        document_id: &DocumentId,
        signer_id: &UserId,
        file: DocumentFile,
    ) -> Result<DocumentProjection, DocflowError> {
        let mut entry =
            self.documents
                .get_mut(document_id)
                .ok_or_else(|| DocflowError::DocumentNotFound {
                    document_id: document_id.clone(),
                })?;
        let doc = entry.value_mut();

        self.ledger.ensure_can_sign(document_id, signer_id)?;
        if !doc.is_signable() {
            return Err(DocflowError::InvalidStatusTransition {
                from: doc.status,
                action: "sign",
            });
        }

        let new_path = self.files.replace_document(&file, &doc.file)?;
        doc.replace_file(new_path);

        self.ledger.mark_signed(document_id, signer_id)?;
        let all_signatures_complete = self.ledger.all_signed(document_id);
        doc.apply(
            DocumentAction::Sign {
                all_signatures_complete,
            },
            Some(signer_id.clone()),
        )?;

        if doc.status == DocumentStatus::Signed {
            if let Err(e) = self.notifier.document_fully_signed(doc) {
                tracing::warn!(
                    error = %e,
                    document_id = %document_id,
                    "fully-signed notification failed"
                );
            }
        }
        Ok(DocumentProjection::from(&*doc))
    }

    /// Record a signer's refusal and send the document back for rework.
    ///
    /// The `Reject` transition is probed before the ledger records the
    /// refusal: rejecting a document that is not collecting signatures
    /// fails without marking anything, and a refusal by a signer without a
    /// request fails before the status changes.
    pub fn reject_document(
        &self,
        document_id: &DocumentId,
        signer_id: &UserId,
        reason: impl Into<String>,
    ) -> Result<DocumentProjection, DocflowError> {
        let mut entry =
            self.documents
                .get_mut(document_id)
                .ok_or_else(|| DocflowError::DocumentNotFound {
                    document_id: document_id.clone(),
                })?;
        let doc = entry.value_mut();

        apply_action(doc.status, DocumentAction::Reject)?;

        self.ledger.mark_rejected(document_id, signer_id, reason)?;
        doc.apply(DocumentAction::Reject, Some(signer_id.clone()))?;
        Ok(DocumentProjection::from(&*doc))
    }

    /// Reopen a rejected document for correction.
    pub fn correct_document(
        &self,
        user_auth0_id: &Auth0Id,
        transaction_id: &TransactionId,
        document_id: &DocumentId,
    ) -> Result<DocumentProjection, DocflowError> {
        let grant = self
            .access
            .verify_user_can_access_transaction(transaction_id, user_auth0_id)?;

        let mut entry = self.locked_document(document_id, transaction_id)?;
        let doc = entry.value_mut();
        doc.apply(
            DocumentAction::CorrectDocument,
            Some(grant.participant.user_id),
        )?;
        Ok(DocumentProjection::from(&*doc))
    }

    /// Archive a document, closing its lifecycle.
    pub fn archive_document(
        &self,
        user_auth0_id: &Auth0Id,
        transaction_id: &TransactionId,
        document_id: &DocumentId,
    ) -> Result<DocumentProjection, DocflowError> {
        let grant = self
            .access
            .verify_user_can_access_transaction(transaction_id, user_auth0_id)?;

        let mut entry = self.locked_document(document_id, transaction_id)?;
        let doc = entry.value_mut();
        doc.apply(DocumentAction::Archive, Some(grant.participant.user_id))?;
        Ok(DocumentProjection::from(&*doc))
    }

    /// Get a document by ID.
    pub fn get_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<DocumentProjection, DocflowError> {
        self.documents
            .get(document_id)
            .map(|entry| DocumentProjection::from(entry.value()))
            .ok_or_else(|| DocflowError::DocumentNotFound {
                document_id: document_id.clone(),
            })
    }

    /// List all documents of one transaction.
    pub fn list_documents(&self, transaction_id: &TransactionId) -> Vec<DocumentProjection> {
        self.documents
            .iter()
            .filter(|entry| entry.value().transaction_id == *transaction_id)
            .map(|entry| DocumentProjection::from(entry.value()))
            .collect()
    }

    /// Snapshot of a document's signature requests, in issuance order.
    pub fn signature_requests(&self, document_id: &DocumentId) -> Vec<SignatureRequest> {
        self.ledger.requests_for(document_id)
    }

    /// Generate a time-limited view URL for a document's current content.
    ///
    /// Expiry comes from [`DocflowConfig::secure_url_expiry_hours`].
    pub fn document_view_url(&self, document_id: &DocumentId) -> Result<String, DocflowError> {
        let file = self
            .documents
            .get(document_id)
            .map(|entry| entry.value().file.clone())
            .ok_or_else(|| DocflowError::DocumentNotFound {
                document_id: document_id.clone(),
            })?;
        Ok(self
            .files
            .generate_secure_url(&file, self.config.secure_url_expiry_hours)?)
    }

    /// Insert a document record directly (used for hydration from
    /// persistence). No authorization, no transition.
    pub fn insert_document(&self, document: Document) {
        self.documents
            .insert(document.document_id.clone(), document);
    }

    /// Insert a signature request directly (used for hydration from
    /// persistence).
    pub fn insert_signature_request(&self, request: SignatureRequest) {
        self.ledger.insert(request);
    }

    /// Look up a document under its entry write lock, confirming it belongs
    /// to the authorized transaction. A document outside that transaction
    /// is reported as missing, so callers cannot probe other transactions'
    /// documents.
    fn locked_document(
        &self,
        document_id: &DocumentId,
        transaction_id: &TransactionId,
    ) -> Result<RefMut<'_, DocumentId, Document>, DocflowError> {
        let entry = self
            .documents
            .get_mut(document_id)
            .ok_or_else(|| DocflowError::DocumentNotFound {
                document_id: document_id.clone(),
            })?;
        if entry.value().transaction_id != *transaction_id {
            return Err(DocflowError::DocumentNotFound {
                document_id: document_id.clone(),
            });
        }
        Ok(entry)
    }
}

impl std::fmt::Debug for DocumentFlowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFlowService")
            .field("documents_count", &self.documents.len())
            .field("templates_count", &self.templates.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
