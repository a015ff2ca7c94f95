//! # Transaction Access Interface
//!
//! Defines the authorization seam between the document flow and whatever
//! system owns transactions and their participants.
//!
//! ## Architecture
//!
//! The `TransactionAccess` trait abstracts over the transaction backend.
//! Production deployments implement it against the live transaction
//! service; test environments use `MockTransactionAccess`. The document
//! flow never stores participants itself — every authorization and
//! identity lookup crosses this seam.
//!
//! ## Participants
//!
//! A transaction carries a declared set of participants: the coordinating
//! agent who runs the document workflow, real estate agents for either
//! side, the clients (buyers and sellers), and supporting professionals
//! (notaries, inspectors, lenders). Only declared participants can touch
//! a transaction's documents, and only declared participants can be asked
//! to sign.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use troom_core::{Auth0Id, TransactionId, UserId};

// ---------------------------------------------------------------------------
// Participant types
// ---------------------------------------------------------------------------

/// Role of a participant within a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// The agent coordinating the transaction's document workflow.
    CoordinatingAgent,
    /// A real estate agent representing one side.
    RealEstateAgent,
    /// A buying or selling client.
    Client,
    /// A supporting professional (notary, inspector, lender).
    Professional,
}

impl ParticipantRole {
    /// Canonical lowercase identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoordinatingAgent => "coordinating_agent",
            Self::RealEstateAgent => "real_estate_agent",
            Self::Client => "client",
            Self::Professional => "professional",
        }
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared participant of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Internal user identity.
    pub user_id: UserId,
    /// Identity-provider subject for the participant's login.
    pub auth0_id: Auth0Id,
    /// Display name (e.g., "Maria Keller").
    pub display_name: String,
    /// Role within the transaction.
    pub role: ParticipantRole,
}

/// Summary of a transaction, as resolved by the access backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// Transaction identity.
    pub transaction_id: TransactionId,
    /// Street address of the property under transaction.
    pub property_address: String,
}

/// Proof that a user may act on a transaction: the resolved transaction
/// plus the participant record the user was matched to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionGrant {
    /// The transaction the user was granted access to.
    pub transaction: TransactionSummary,
    /// The participant record matching the requesting user.
    pub participant: Participant,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from transaction access operations.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The transaction does not exist.
    #[error("transaction {transaction_id} not found")]
    TransactionNotFound {
        /// The transaction that was looked up.
        transaction_id: TransactionId,
    },

    /// The user is not a declared participant of the transaction.
    #[error("user {auth0_id} is not a participant in transaction {transaction_id}")]
    NotAParticipant {
        /// The transaction.
        transaction_id: TransactionId,
        /// The requesting user's identity-provider subject.
        auth0_id: Auth0Id,
    },

    /// The access backend is unreachable or failed.
    #[error("transaction access backend error: {reason}")]
    Backend {
        /// Description of the backend failure.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Access to transactions and their declared participants.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc`. The trait is object-safe to support runtime selection (mock vs.
/// live backend).
pub trait TransactionAccess: Send + Sync {
    /// Verify that a logged-in user may act on a transaction.
    ///
    /// # Errors
    ///
    /// [`AccessError::TransactionNotFound`] when the transaction does not
    /// exist; [`AccessError::NotAParticipant`] when the user is not among
    /// its declared participants.
    fn verify_user_can_access_transaction(
        &self,
        transaction_id: &TransactionId,
        auth0_id: &Auth0Id,
    ) -> Result<TransactionGrant, AccessError>;

    /// Resolve a participant of a transaction by internal user identity.
    ///
    /// Returns `Ok(None)` when the transaction exists but the user is not
    /// declared in it.
    ///
    /// # Errors
    ///
    /// [`AccessError::TransactionNotFound`] when the transaction does not
    /// exist.
    fn find_participant(
        &self,
        transaction_id: &TransactionId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, AccessError>;
}

// ---------------------------------------------------------------------------
// Mock implementation
// ---------------------------------------------------------------------------

/// In-memory transaction access backend for testing and development.
///
/// Transactions and participants are registered explicitly; lookups
/// behave exactly like the trait contract describes.
#[derive(Debug, Default)]
pub struct MockTransactionAccess {
    transactions: DashMap<TransactionId, TransactionSummary>,
    participants: DashMap<TransactionId, Vec<Participant>>,
}

impl MockTransactionAccess {
    /// Create an empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transaction.
    pub fn add_transaction(&self, summary: TransactionSummary) {
        self.transactions
            .insert(summary.transaction_id.clone(), summary);
    }

    /// Declare a participant on a registered transaction.
    pub fn add_participant(&self, transaction_id: &TransactionId, participant: Participant) {
        self.participants
            .entry(transaction_id.clone())
            .or_default()
            .push(participant);
    }
}

impl TransactionAccess for MockTransactionAccess {
    fn verify_user_can_access_transaction(
        &self,
        transaction_id: &TransactionId,
        auth0_id: &Auth0Id,
    ) -> Result<TransactionGrant, AccessError> {
        let transaction = self
            .transactions
            .get(transaction_id)
            .map(|t| t.clone())
            .ok_or_else(|| AccessError::TransactionNotFound {
                transaction_id: transaction_id.clone(),
            })?;

        let participant = self
            .participants
            .get(transaction_id)
            .and_then(|list| list.iter().find(|p| &p.auth0_id == auth0_id).cloned())
            .ok_or_else(|| AccessError::NotAParticipant {
                transaction_id: transaction_id.clone(),
                auth0_id: auth0_id.clone(),
            })?;

        Ok(TransactionGrant {
            transaction,
            participant,
        })
    }

    fn find_participant(
        &self,
        transaction_id: &TransactionId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, AccessError> {
        if !self.transactions.contains_key(transaction_id) {
            return Err(AccessError::TransactionNotFound {
                transaction_id: transaction_id.clone(),
            });
        }

        Ok(self
            .participants
            .get(transaction_id)
            .and_then(|list| list.iter().find(|p| &p.user_id == user_id).cloned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
