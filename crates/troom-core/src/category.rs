//! # Document Categories
//!
//! The closed set of document categories a property transaction can carry.
//!
//! The set is closed on purpose: downstream consumers (signing rules,
//! rendering, retention policy) match exhaustively on it, and a new
//! category is a reviewed schema change, not runtime data.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of document categories.
pub const DOCUMENT_CATEGORY_COUNT: usize = 8;

/// Category of a transaction document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// Purchase or lease contract between the parties.
    Contract,
    /// Seller disclosure statements.
    Disclosure,
    /// Insurance certificates and binders.
    Insurance,
    /// Inspection reports.
    Inspection,
    /// Appraisal reports.
    Appraisal,
    /// Title and deed documents.
    Title,
    /// Loan and financing documents.
    Financing,
    /// Amendments and addenda to previously issued documents.
    Amendment,
}

impl DocumentCategory {
    /// Canonical lowercase identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Disclosure => "disclosure",
            Self::Insurance => "insurance",
            Self::Inspection => "inspection",
            Self::Appraisal => "appraisal",
            Self::Title => "title",
            Self::Financing => "financing",
            Self::Amendment => "amendment",
        }
    }

    /// All categories, in declaration order.
    pub fn all_categories() -> [DocumentCategory; DOCUMENT_CATEGORY_COUNT] {
        [
            Self::Contract,
            Self::Disclosure,
            Self::Insurance,
            Self::Inspection,
            Self::Appraisal,
            Self::Title,
            Self::Financing,
            Self::Amendment,
        ]
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contract" => Ok(Self::Contract),
            "disclosure" => Ok(Self::Disclosure),
            "insurance" => Ok(Self::Insurance),
            "inspection" => Ok(Self::Inspection),
            "appraisal" => Ok(Self::Appraisal),
            "title" => Ok(Self::Title),
            "financing" => Ok(Self::Financing),
            "amendment" => Ok(Self::Amendment),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn count_matches_all() {
        assert_eq!(DocumentCategory::all_categories().len(), DOCUMENT_CATEGORY_COUNT);
    }

    #[test]
    fn as_str_round_trips_through_from_str() {
        for category in DocumentCategory::all_categories() {
            assert_eq!(DocumentCategory::from_str(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = DocumentCategory::from_str("escrow").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory(_)));
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert!(DocumentCategory::from_str("Contract").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&DocumentCategory::Title).unwrap();
        assert_eq!(json, "\"title\"");
        let back: DocumentCategory = serde_json::from_str("\"financing\"").unwrap();
        assert_eq!(back, DocumentCategory::Financing);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(DocumentCategory::Appraisal.to_string(), "appraisal");
    }
}
