use super::{
    errors::MergeError,
    locate::{locate_matching_ca_bundles, locate_matching_cert_key_pairs},
    mapping::CertIdentifierMappings,
};
use crate::certgraph::{CertKeyPair, CertificateAuthorityBundle};

/// An incoming item that is the same artifact as the existing entry at `existing_index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MergeTarget<T> {
    pub(crate) existing_index: usize,
    pub(crate) incoming: T,
}

/// The outcome of categorizing a batch of incoming items against the existing registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Categorized<T> {
    /// Items matching exactly one existing entry
    pub(crate) to_merge: Vec<MergeTarget<T>>,
    /// Items matching nothing
    pub(crate) to_add: Vec<T>,
    /// One error per item matching more than one existing entry, those items are dropped
    pub(crate) errors: Vec<MergeError>,
}

fn categorize<T, L, E>(existing: &[T], incoming: &[T], locate: L, ambiguity_error: E) -> Categorized<T>
where
    T: Clone + std::fmt::Display,
    L: Fn(&[T], &T) -> Vec<usize>,
    E: Fn(&T, Vec<&T>) -> MergeError,
{
    let mut categorized = Categorized {
        to_merge: vec![],
        to_add: vec![],
        errors: vec![],
    };

    for item in incoming {
        match locate(existing, item).as_slice() {
            [] => {
                log::debug!("{} is new", item);
                categorized.to_add.push(item.clone());
            }
            [existing_index] => {
                log::debug!("{} is {}", item, existing[*existing_index]);
                categorized.to_merge.push(MergeTarget {
                    existing_index: *existing_index,
                    incoming: item.clone(),
                });
            }
            existing_indices => {
                let error = ambiguity_error(item, existing_indices.iter().map(|index| &existing[*index]).collect());
                log::debug!("dropping conflicting item: {}", error);
                categorized.errors.push(error);
            }
        }
    }

    categorized
}

/// Splits incoming cert/key pairs into new ones and ones already in `existing`. For the latter
/// the returned mappings record how their identifier is to be rewritten to the one the registry
/// already knows them by.
pub(crate) fn categorize_cert_key_pairs(
    existing: &[CertKeyPair],
    incoming: &[CertKeyPair],
) -> (Categorized<CertKeyPair>, CertIdentifierMappings) {
    let categorized = categorize(existing, incoming, locate_matching_cert_key_pairs, |item, matches| {
        MergeError::AmbiguousCertKeyPairLocation {
            incoming: item.to_string(),
            matches: matches.into_iter().map(|matched| matched.identifier().clone()).collect(),
        }
    });

    let mut mappings = CertIdentifierMappings::new();
    for target in &categorized.to_merge {
        mappings.record(target.incoming.identifier(), existing[target.existing_index].identifier());
    }

    (categorized, mappings)
}

/// Same as [`categorize_cert_key_pairs`] but for CA bundles. Bundles have no identifier of their
/// own so there's nothing to map, their certificates get mapped through the cert/key pair
/// mappings instead.
pub(crate) fn categorize_ca_bundles(
    existing: &[CertificateAuthorityBundle],
    incoming: &[CertificateAuthorityBundle],
) -> Categorized<CertificateAuthorityBundle> {
    categorize(existing, incoming, locate_matching_ca_bundles, |item, matches| {
        MergeError::AmbiguousCaBundleLocation {
            incoming: item.to_string(),
            matches: matches.into_iter().map(ToString::to_string).collect(),
        }
    })
}
