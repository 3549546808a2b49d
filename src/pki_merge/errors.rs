use crate::certgraph::identifier::CertIdentifier;
use itertools::Itertools;
use thiserror::Error;

/// A data-quality problem found while folding one PKI list into another. None of these abort
/// the fold, the offending item is left out and the remaining items are still merged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum MergeError {
    #[error(
        "{incoming} shares locations with {} distinct existing cert/key pairs: {}",
        .matches.len(),
        .matches.iter().join(", ")
    )]
    AmbiguousCertKeyPairLocation { incoming: String, matches: Vec<CertIdentifier> },

    #[error(
        "{incoming} shares locations with {} distinct existing CA bundles: {}",
        .matches.len(),
        .matches.iter().join("; ")
    )]
    AmbiguousCaBundleLocation { incoming: String, matches: Vec<String> },

    #[error(
        "identifier {identifier} is mapped to {} distinct identifiers: {}",
        .candidates.len(),
        .candidates.iter().join(", ")
    )]
    AmbiguousIdentifierMapping {
        identifier: CertIdentifier,
        candidates: Vec<CertIdentifier>,
    },
}

/// Every error collected over a whole multi-list merge. When there is at least one, no merged
/// list is produced at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("merging PKI lists failed with {} error(s): {}", .0.len(), .0.iter().join("; "))]
pub(crate) struct MergeErrors(pub(crate) Vec<MergeError>);

impl MergeErrors {
    pub(crate) fn errors(&self) -> &[MergeError] {
        &self.0
    }
}
