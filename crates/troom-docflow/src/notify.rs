//! # Signature Notification Interface
//!
//! Defines the outbound notification seam. Delivery (email, push, in-app)
//! is another system's job; this module only fixes the two events the
//! document flow emits and the contract that emitting them is
//! fire-and-forget: a failed notification is logged by the caller and
//! never fails the operation that triggered it.

use std::sync::Mutex;

use troom_core::{DocumentId, UserId};
use troom_signing::SignatureRequest;
use troom_state::Document;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The notification could not be handed to the delivery system.
    #[error("notification delivery failed: {reason}")]
    Delivery {
        /// Description of the delivery failure.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Outbound notifications about signature activity.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc`. The trait is object-safe.
pub trait SignatureNotifier: Send + Sync {
    /// A signature was requested from a participant.
    fn signature_requested(
        &self,
        request: &SignatureRequest,
        document: &Document,
    ) -> Result<(), NotifyError>;

    /// Every requested signature on a document has been collected.
    fn document_fully_signed(&self, document: &Document) -> Result<(), NotifyError>;
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// Notifier that drops every event. For deployments and tests that do not
/// care about notifications.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl SignatureNotifier for NoopNotifier {
    fn signature_requested(
        &self,
        _request: &SignatureRequest,
        _document: &Document,
    ) -> Result<(), NotifyError> {
        Ok(())
    }

    fn document_fully_signed(&self, _document: &Document) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// An event captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    /// `signature_requested` was emitted.
    SignatureRequested {
        /// The document the request is for.
        document_id: DocumentId,
        /// The participant asked to sign.
        signer_id: UserId,
    },
    /// `document_fully_signed` was emitted.
    DocumentFullySigned {
        /// The completed document.
        document_id: DocumentId,
    },
}

/// Notifier that records every event for test assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotifierEvent>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, in emission order.
    pub fn events(&self) -> Vec<NotifierEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, event: NotifierEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl SignatureNotifier for RecordingNotifier {
    fn signature_requested(
        &self,
        request: &SignatureRequest,
        document: &Document,
    ) -> Result<(), NotifyError> {
        self.record(NotifierEvent::SignatureRequested {
            document_id: document.document_id.clone(),
            signer_id: request.signer_id.clone(),
        });
        Ok(())
    }

    fn document_fully_signed(&self, document: &Document) -> Result<(), NotifyError> {
        self.record(NotifierEvent::DocumentFullySigned {
            document_id: document.document_id.clone(),
        });
        Ok(())
    }
}

/// Notifier that fails every delivery. Exists to prove the document flow
/// treats notification failures as non-fatal.
#[derive(Debug, Clone, Default)]
pub struct FailingNotifier;

impl SignatureNotifier for FailingNotifier {
    fn signature_requested(
        &self,
        _request: &SignatureRequest,
        _document: &Document,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery {
            reason: "delivery channel down".to_string(),
        })
    }

    fn document_fully_signed(&self, _document: &Document) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery {
            reason: "delivery channel down".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
