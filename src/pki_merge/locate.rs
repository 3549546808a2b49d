use crate::certgraph::{CertKeyPair, CertificateAuthorityBundle};

/// Finds the entries of `items` which are stored in at least one of the places `target` is
/// stored in. Returns their indices in `items`, in order.
///
/// An entry that shares several locations with the target is still only reported once, and so
/// are distinct entries that turn out to be the same certificate (by identifier). The caller
/// decides what zero, one or many matches mean.
pub(crate) fn locate_matching_cert_key_pairs(items: &[CertKeyPair], target: &CertKeyPair) -> Vec<usize> {
    let mut matches: Vec<usize> = vec![];

    for (index, item) in items.iter().enumerate() {
        if !target.shares_location_with(item) {
            continue;
        }

        if matches
            .iter()
            .any(|&matched_index| items[matched_index].identifier().matches(item.identifier()))
        {
            continue;
        }

        matches.push(index);
    }

    matches
}

/// Same as [`locate_matching_cert_key_pairs`], but for CA bundles. Bundles are considered the
/// same when they bundle the same set of certificates.
pub(crate) fn locate_matching_ca_bundles(items: &[CertificateAuthorityBundle], target: &CertificateAuthorityBundle) -> Vec<usize> {
    let mut matches: Vec<usize> = vec![];

    for (index, item) in items.iter().enumerate() {
        if !target.shares_location_with(item) {
            continue;
        }

        if matches
            .iter()
            .any(|&matched_index| items[matched_index].same_certificates_as(item))
        {
            continue;
        }

        matches.push(index);
    }

    matches
}
