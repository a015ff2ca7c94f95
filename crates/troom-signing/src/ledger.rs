//! # Signature Ledger
//!
//! In-memory signature request ledger backed by `DashMap`, keyed by
//! document. Issues requests, answers eligibility queries, and records
//! fulfillments and rejections.
//!
//! Uniqueness of (document, signer) is enforced under the document's entry
//! lock: the duplicate check and the insert run under a single write lock,
//! so two racing requests for the same signer cannot both succeed.

use dashmap::DashMap;

use troom_core::{DocumentId, Timestamp, UserId};

use crate::request::{SignatureRequest, SigningEligibility, SigningError};

// ---------------------------------------------------------------------------
// Signature Ledger
// ---------------------------------------------------------------------------

/// Thread-safe ledger of signature requests, keyed by document.
///
/// Requests are never deleted. Rejection and fulfillment mutate the
/// request in place, so the ledger is a complete history of who was asked
/// to sign each document and what became of each request.
pub struct SignatureLedger {
    requests: DashMap<DocumentId, Vec<SignatureRequest>>,
}

impl SignatureLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            requests: DashMap::new(),
        }
    }

    /// Issue a signature request for one signer on one document.
    ///
    /// Atomic: the per-signer uniqueness check and the insert run under
    /// the document's entry write lock.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::SignatureAlreadyRequested`] when any
    /// request for this (document, signer) pair already exists, whatever
    /// its state. No row is created in that case.
    pub fn request_signature(
        &self,
        document_id: DocumentId,
        signer_id: UserId,
    ) -> Result<SignatureRequest, SigningError> {
        let mut entry = self.requests.entry(document_id.clone()).or_default();

        if entry.iter().any(|r| r.signer_id == signer_id) {
            return Err(SigningError::SignatureAlreadyRequested {
                document_id,
                signer_id,
            });
        }

        let request = SignatureRequest::new(document_id, signer_id);
        entry.push(request.clone());
        Ok(request)
    }

    /// The ledger's verdict on whether a participant may sign a document
    /// right now.
    ///
    /// - pending request → [`SigningEligibility::Eligible`]
    /// - fulfilled request → [`SigningEligibility::AlreadySigned`]
    /// - no request, or a rejected one → [`SigningEligibility::NotASigner`]
    pub fn eligibility(
        &self,
        document_id: &DocumentId,
        signer_id: &UserId,
    ) -> SigningEligibility {
        let Some(entry) = self.requests.get(document_id) else {
            return SigningEligibility::NotASigner;
        };
        match entry.iter().find(|r| &r.signer_id == signer_id) {
            Some(r) if r.is_signed => SigningEligibility::AlreadySigned,
            Some(r) if r.is_pending() => SigningEligibility::Eligible,
            _ => SigningEligibility::NotASigner,
        }
    }

    /// Validate that a participant may sign, as an error for the signing
    /// path to propagate.
    ///
    /// # Errors
    ///
    /// [`SigningError::DocumentAlreadySigned`] for a fulfilled request,
    /// [`SigningError::UserCannotSign`] when no pending request exists.
    pub fn ensure_can_sign(
        &self,
        document_id: &DocumentId,
        signer_id: &UserId,
    ) -> Result<(), SigningError> {
        match self.eligibility(document_id, signer_id) {
            SigningEligibility::Eligible => Ok(()),
            SigningEligibility::AlreadySigned => Err(SigningError::DocumentAlreadySigned {
                document_id: document_id.clone(),
                signer_id: signer_id.clone(),
            }),
            SigningEligibility::NotASigner => Err(SigningError::UserCannotSign {
                document_id: document_id.clone(),
                signer_id: signer_id.clone(),
            }),
        }
    }

    /// Whether every request for this document has been fulfilled.
    ///
    /// A document with zero requests is vacuously complete. The signing
    /// path never observes that case — collecting a signature requires an
    /// eligible request, which requires a request to exist — but callers
    /// asking the question out of band should know the convention.
    pub fn all_signed(&self, document_id: &DocumentId) -> bool {
        self.requests
            .get(document_id)
            .map(|entry| entry.iter().all(|r| r.is_signed))
            .unwrap_or(true)
    }

    /// Record a collected signature.
    ///
    /// Sets `is_signed` and stamps `signed_at`.
    ///
    /// # Errors
    ///
    /// [`SigningError::DocumentAlreadySigned`] when the request was
    /// already fulfilled; [`SigningError::UserCannotSign`] when no pending
    /// request exists (never issued, or rejected).
    pub fn mark_signed(
        &self,
        document_id: &DocumentId,
        signer_id: &UserId,
    ) -> Result<SignatureRequest, SigningError> {
        let mut entry =
            self.requests
                .get_mut(document_id)
                .ok_or_else(|| SigningError::UserCannotSign {
                    document_id: document_id.clone(),
                    signer_id: signer_id.clone(),
                })?;

        let request = entry
            .iter_mut()
            .find(|r| &r.signer_id == signer_id)
            .ok_or_else(|| SigningError::UserCannotSign {
                document_id: document_id.clone(),
                signer_id: signer_id.clone(),
            })?;

        if request.is_signed {
            return Err(SigningError::DocumentAlreadySigned {
                document_id: document_id.clone(),
                signer_id: signer_id.clone(),
            });
        }
        if request.rejection_reason.is_some() {
            return Err(SigningError::UserCannotSign {
                document_id: document_id.clone(),
                signer_id: signer_id.clone(),
            });
        }

        request.is_signed = true;
        request.signed_at = Some(Timestamp::now());
        Ok(request.clone())
    }

    /// Record a signer's refusal.
    ///
    /// Sets the rejection reason and clears any recorded signature: a
    /// rejection always leaves the request unfulfilled.
    ///
    /// # Errors
    ///
    /// [`SigningError::UserCannotSign`] when no request exists for this
    /// (document, signer) pair.
    pub fn mark_rejected(
        &self,
        document_id: &DocumentId,
        signer_id: &UserId,
        reason: impl Into<String>,
    ) -> Result<SignatureRequest, SigningError> {
        let mut entry =
            self.requests
                .get_mut(document_id)
                .ok_or_else(|| SigningError::UserCannotSign {
                    document_id: document_id.clone(),
                    signer_id: signer_id.clone(),
                })?;

        let request = entry
            .iter_mut()
            .find(|r| &r.signer_id == signer_id)
            .ok_or_else(|| SigningError::UserCannotSign {
                document_id: document_id.clone(),
                signer_id: signer_id.clone(),
            })?;

        request.is_signed = false;
        request.signed_at = None;
        request.rejection_reason = Some(reason.into());
        Ok(request.clone())
    }

    /// Snapshot of all requests for a document, in issuance order.
    pub fn requests_for(&self, document_id: &DocumentId) -> Vec<SignatureRequest> {
        self.requests
            .get(document_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Insert a request record directly (used for hydration from storage).
    ///
    /// Bypasses the duplicate check; persistent storage enforces
    /// uniqueness on its side.
    pub fn insert(&self, request: SignatureRequest) {
        self.requests
            .entry(request.document_id.clone())
            .or_default()
            .push(request);
    }
}

impl Default for SignatureLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignatureLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureLedger")
            .field("documents_count", &self.requests.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_signature_creates_pending_request() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        let req = ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        assert_eq!(req.document_id, document_id);
        assert_eq!(req.signer_id, signer_id);
        assert!(req.is_pending());
    }

    #[test]
    fn duplicate_request_fails_and_adds_no_row() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        let result = ledger.request_signature(document_id.clone(), signer_id.clone());

        assert!(matches!(
            result,
            Err(SigningError::SignatureAlreadyRequested { .. })
        ));
        assert_eq!(ledger.requests_for(&document_id).len(), 1);
    }

    #[test]
    fn duplicate_request_fails_even_after_fulfillment() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        ledger.mark_signed(&document_id, &signer_id).unwrap();

        let result = ledger.request_signature(document_id.clone(), signer_id.clone());
        assert!(matches!(
            result,
            Err(SigningError::SignatureAlreadyRequested { .. })
        ));
    }

    #[test]
    fn same_signer_different_documents_is_fine() {
        let ledger = SignatureLedger::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(DocumentId::new(), signer_id.clone())
            .unwrap();
        ledger
            .request_signature(DocumentId::new(), signer_id)
            .unwrap();
    }

    #[test]
    fn multiple_signers_one_document() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();

        ledger
            .request_signature(document_id.clone(), UserId::new())
            .unwrap();
        ledger
            .request_signature(document_id.clone(), UserId::new())
            .unwrap();
        assert_eq!(ledger.requests_for(&document_id).len(), 2);
    }

    // -- Eligibility -----------------------------------------------------

    #[test]
    fn eligibility_without_request_is_not_a_signer() {
        let ledger = SignatureLedger::new();
        assert_eq!(
            ledger.eligibility(&DocumentId::new(), &UserId::new()),
            SigningEligibility::NotASigner
        );
    }

    #[test]
    fn eligibility_lifecycle() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        assert_eq!(
            ledger.eligibility(&document_id, &signer_id),
            SigningEligibility::Eligible
        );

        ledger.mark_signed(&document_id, &signer_id).unwrap();
        assert_eq!(
            ledger.eligibility(&document_id, &signer_id),
            SigningEligibility::AlreadySigned
        );
    }

    #[test]
    fn eligibility_after_rejection_is_not_a_signer() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        ledger
            .mark_rejected(&document_id, &signer_id, "missing appendix")
            .unwrap();
        assert_eq!(
            ledger.eligibility(&document_id, &signer_id),
            SigningEligibility::NotASigner
        );
    }

    #[test]
    fn eligibility_is_per_signer() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let asked = UserId::new();
        let not_asked = UserId::new();

        ledger
            .request_signature(document_id.clone(), asked.clone())
            .unwrap();
        assert_eq!(
            ledger.eligibility(&document_id, &asked),
            SigningEligibility::Eligible
        );
        assert_eq!(
            ledger.eligibility(&document_id, &not_asked),
            SigningEligibility::NotASigner
        );
    }

    #[test]
    fn ensure_can_sign_maps_verdicts_to_errors() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        assert!(matches!(
            ledger.ensure_can_sign(&document_id, &signer_id),
            Err(SigningError::UserCannotSign { .. })
        ));

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        assert!(ledger.ensure_can_sign(&document_id, &signer_id).is_ok());

        ledger.mark_signed(&document_id, &signer_id).unwrap();
        assert!(matches!(
            ledger.ensure_can_sign(&document_id, &signer_id),
            Err(SigningError::DocumentAlreadySigned { .. })
        ));
    }

    // -- Completion ------------------------------------------------------

    #[test]
    fn all_signed_is_vacuously_true_without_requests() {
        let ledger = SignatureLedger::new();
        assert!(ledger.all_signed(&DocumentId::new()));
    }

    #[test]
    fn all_signed_tracks_every_request() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let first = UserId::new();
        let second = UserId::new();

        ledger
            .request_signature(document_id.clone(), first.clone())
            .unwrap();
        ledger
            .request_signature(document_id.clone(), second.clone())
            .unwrap();
        assert!(!ledger.all_signed(&document_id));

        ledger.mark_signed(&document_id, &first).unwrap();
        assert!(!ledger.all_signed(&document_id));

        ledger.mark_signed(&document_id, &second).unwrap();
        assert!(ledger.all_signed(&document_id));
    }

    // -- Marking ---------------------------------------------------------

    #[test]
    fn mark_signed_sets_signature_fields() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        let req = ledger.mark_signed(&document_id, &signer_id).unwrap();
        assert!(req.is_signed);
        assert!(req.signed_at.is_some());
    }

    #[test]
    fn mark_signed_twice_fails() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        ledger.mark_signed(&document_id, &signer_id).unwrap();

        assert!(matches!(
            ledger.mark_signed(&document_id, &signer_id),
            Err(SigningError::DocumentAlreadySigned { .. })
        ));
    }

    #[test]
    fn mark_signed_without_request_fails() {
        let ledger = SignatureLedger::new();
        assert!(matches!(
            ledger.mark_signed(&DocumentId::new(), &UserId::new()),
            Err(SigningError::UserCannotSign { .. })
        ));
    }

    #[test]
    fn mark_signed_on_rejected_request_fails() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        ledger
            .mark_rejected(&document_id, &signer_id, "terms changed")
            .unwrap();

        assert!(matches!(
            ledger.mark_signed(&document_id, &signer_id),
            Err(SigningError::UserCannotSign { .. })
        ));
    }

    #[test]
    fn mark_rejected_records_reason() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        let req = ledger
            .mark_rejected(&document_id, &signer_id, "wrong closing date")
            .unwrap();
        assert_eq!(req.rejection_reason.as_deref(), Some("wrong closing date"));
        assert!(!req.is_signed);
        assert!(req.signed_at.is_none());
    }

    #[test]
    fn mark_rejected_clears_a_previous_signature() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        ledger
            .request_signature(document_id.clone(), signer_id.clone())
            .unwrap();
        ledger.mark_signed(&document_id, &signer_id).unwrap();
        assert!(ledger.all_signed(&document_id));

        let req = ledger
            .mark_rejected(&document_id, &signer_id, "signed in error")
            .unwrap();
        assert!(!req.is_signed);
        assert!(req.signed_at.is_none());
        assert!(!ledger.all_signed(&document_id));
    }

    #[test]
    fn mark_rejected_without_request_fails() {
        let ledger = SignatureLedger::new();
        assert!(matches!(
            ledger.mark_rejected(&DocumentId::new(), &UserId::new(), "no"),
            Err(SigningError::UserCannotSign { .. })
        ));
    }

    // -- Snapshots and hydration ------------------------------------------

    #[test]
    fn requests_for_unknown_document_is_empty() {
        let ledger = SignatureLedger::new();
        assert!(ledger.requests_for(&DocumentId::new()).is_empty());
    }

    #[test]
    fn requests_for_preserves_issuance_order() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let first = UserId::new();
        let second = UserId::new();

        ledger
            .request_signature(document_id.clone(), first.clone())
            .unwrap();
        ledger
            .request_signature(document_id.clone(), second.clone())
            .unwrap();

        let requests = ledger.requests_for(&document_id);
        assert_eq!(requests[0].signer_id, first);
        assert_eq!(requests[1].signer_id, second);
    }

    #[test]
    fn insert_hydrates_existing_request() {
        let ledger = SignatureLedger::new();
        let document_id = DocumentId::new();
        let signer_id = UserId::new();

        let mut stored = SignatureRequest::new(document_id.clone(), signer_id.clone());
        stored.is_signed = true;
        stored.signed_at = Some(Timestamp::now());
        ledger.insert(stored);

        assert_eq!(
            ledger.eligibility(&document_id, &signer_id),
            SigningEligibility::AlreadySigned
        );
        assert!(ledger.all_signed(&document_id));
    }

    #[test]
    fn debug_shows_document_count() {
        let ledger = SignatureLedger::new();
        ledger
            .request_signature(DocumentId::new(), UserId::new())
            .unwrap();
        let rendered = format!("{ledger:?}");
        assert!(rendered.contains("documents_count"));
    }
}
