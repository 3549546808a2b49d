//! Merges the PKI lists reported by independent probes into a single registry in which every
//! certificate appears once, no matter how many probes found it or under how many different
//! fingerprints.
//!
//! Two artifacts are the same when they share a location (a secret, a config map, a file).
//! When an incoming artifact is found to be an existing one, the existing identifier wins and the
//! incoming identifier is recorded as an alias of it for the rest of that fold.

use crate::certgraph::PkiList;
use tokio_util::sync::CancellationToken;

mod categorize;
pub(crate) mod errors;
mod locate;
mod mapping;
mod merge;

#[cfg(test)]
pub(crate) mod test_builders;

pub(crate) use self::{errors::MergeErrors, merge::merge_one_raw_pki_list};

/// Folds all lists, in order, into an initially empty registry. Any error in any fold fails the
/// whole merge, there is no partial result.
pub(crate) fn merge_raw_pki_lists(cancel: &CancellationToken, pki_lists: &[PkiList]) -> Result<PkiList, MergeErrors> {
    let mut merged = PkiList::default();
    let mut errors = vec![];

    for (index, pki_list) in pki_lists.iter().enumerate() {
        let (folded, fold_errors) = merge_one_raw_pki_list(cancel, &merged, pki_list);

        log::info!(
            "merged PKI list {}/{}{}: {} cert/key pair(s), {} CA bundle(s) so far, {} error(s)",
            index + 1,
            pki_lists.len(),
            if pki_list.logical_name.is_empty() {
                String::new()
            } else {
                format!(" ({})", pki_list.logical_name)
            },
            folded.cert_key_pairs.items.len(),
            folded.certificate_authority_bundles.items.len(),
            fold_errors.len(),
        );

        merged = folded;
        errors.extend(fold_errors);
    }

    if !errors.is_empty() {
        return Err(MergeErrors(errors));
    }

    // Collapses locations merged into the same entry more than once during the last fold. With
    // nothing incoming there is nothing to conflict with.
    let (merged, dedup_errors) = merge_one_raw_pki_list(cancel, &merged, &PkiList::default());
    debug_assert!(dedup_errors.is_empty());

    Ok(merged)
}
