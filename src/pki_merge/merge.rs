use super::{
    categorize::{categorize_ca_bundles, categorize_cert_key_pairs},
    errors::MergeError,
    mapping::CertIdentifierMappings,
};
use crate::certgraph::{metadata::CertKeyMetadata, CertKeyPair, CertificateAuthorityBundle, PkiList};
use tokio_util::sync::CancellationToken;

/// Folds `incoming` into `existing`, returning the merged list along with every data-quality
/// problem found on the way. Items that caused a problem are left out of the merged list, the
/// rest is merged regardless.
///
/// Entries of `existing` keep their identifier, name and description. Incoming entries that
/// turn out to be the same artifact only contribute their locations, and their identifier is
/// recorded as an alias of the existing one so that CA bundles in `incoming` referring to it get
/// rewritten to the existing identifier.
///
/// The cancellation token is accepted so that callers can thread it through, a fold always
/// runs to completion.
pub(crate) fn merge_one_raw_pki_list(_cancel: &CancellationToken, existing: &PkiList, incoming: &PkiList) -> (PkiList, Vec<MergeError>) {
    let mut merged = existing.with_deduplicated_locations();
    let mut errors = vec![];

    let mappings = merge_cert_key_pairs(&mut merged.cert_key_pairs.items, &incoming.cert_key_pairs.items, &mut errors);
    merge_ca_bundles(
        &mut merged.certificate_authority_bundles.items,
        &incoming.certificate_authority_bundles.items,
        &mappings,
        &mut errors,
    );

    (merged, errors)
}

fn merge_cert_key_pairs(merged: &mut Vec<CertKeyPair>, incoming: &[CertKeyPair], errors: &mut Vec<MergeError>) -> CertIdentifierMappings {
    let (categorized, mappings) = categorize_cert_key_pairs(merged, incoming);
    errors.extend(categorized.errors);

    for target in categorized.to_merge {
        merged[target.existing_index] = merged[target.existing_index].with_locations_from(&target.incoming);
    }

    for cert_key_pair in categorized.to_add {
        let cert_key_pair = match mappings.map(cert_key_pair.identifier()) {
            Ok(identifier) => cert_key_pair.with_identifier(identifier),
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        // A sibling may have already been merged under the same identifier
        match merged
            .iter()
            .position(|existing| existing.identifier().matches(cert_key_pair.identifier()))
        {
            Some(index) => merged[index] = merged[index].with_locations_from(&cert_key_pair),
            None => merged.push(cert_key_pair),
        }
    }

    mappings
}

fn merge_ca_bundles(
    merged: &mut Vec<CertificateAuthorityBundle>,
    incoming: &[CertificateAuthorityBundle],
    mappings: &CertIdentifierMappings,
    errors: &mut Vec<MergeError>,
) {
    let categorized = categorize_ca_bundles(merged, incoming);
    errors.extend(categorized.errors);

    for target in categorized.to_merge {
        let mut bundle = merged[target.existing_index].with_locations_from(&target.incoming);
        add_mapped_certificates(&mut bundle, &target.incoming.spec.certificate_metadata, mappings, errors);
        merged[target.existing_index] = bundle;
    }

    for incoming_bundle in categorized.to_add {
        let mut bundle = incoming_bundle.with_deduplicated_locations();
        bundle.spec.certificate_metadata = vec![];
        add_mapped_certificates(&mut bundle, &incoming_bundle.spec.certificate_metadata, mappings, errors);
        merged.push(bundle);
    }
}

/// Appends every certificate of `certificates`, under its canonical identifier, that `bundle`
/// doesn't bundle yet.
fn add_mapped_certificates(
    bundle: &mut CertificateAuthorityBundle,
    certificates: &[CertKeyMetadata],
    mappings: &CertIdentifierMappings,
    errors: &mut Vec<MergeError>,
) {
    for metadata in certificates {
        match mappings.map(&metadata.cert_identifier) {
            Ok(identifier) => {
                if !bundle.contains_pubkey_modulus(&identifier.pubkey_modulus) {
                    bundle.spec.certificate_metadata.push(metadata.with_identifier(identifier));
                }
            }
            Err(err) => errors.push(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pki_merge::test_builders::{new_ca_bundle, new_cert_key_pair, new_pki_list};

    fn merge(existing: &PkiList, incoming: &PkiList) -> (PkiList, Vec<MergeError>) {
        merge_one_raw_pki_list(&CancellationToken::new(), existing, incoming)
    }

    fn carrot() -> CertKeyPair {
        new_cert_key_pair()
            .in_cluster("openshift-config", "alpha")
            .in_cluster("openshift-kube-apiserver", "bravo")
            .on_disk_location("/other-serving.crt", "/other-serving.key")
            .with_public_key_modulus("carrot")
            .to_cert_key_pair()
    }

    fn drumstick() -> CertKeyPair {
        new_cert_key_pair()
            .in_cluster("openshift-config", "charlie")
            .in_cluster("openshift-kube-controller-manager", "delta")
            .in_cluster("openshift-config-managed", "echo")
            .on_disk_location("/csr.crt", "/csr.key")
            .with_public_key_modulus("drumstick")
            .to_cert_key_pair()
    }

    fn eggplant() -> CertKeyPair {
        new_cert_key_pair()
            .in_cluster("openshift-etcd", "foxtrot")
            .on_disk_location("/peer.crt", "/peer.key")
            .with_public_key_modulus("eggplant")
            .to_cert_key_pair()
    }

    fn apple() -> CertKeyPair {
        new_cert_key_pair()
            .in_cluster("openshift-config", "alpha")
            .in_cluster("openshift-kube-apiserver", "bravo")
            .on_disk_location("/serving.crt", "/serving.key")
            .with_public_key_modulus("apple")
            .to_cert_key_pair()
    }

    fn banana() -> CertKeyPair {
        new_cert_key_pair()
            .in_cluster("openshift-config", "charlie")
            .in_cluster("openshift-kube-controller-manager", "delta")
            .on_disk_location("/csr.crt", "/csr.key")
            .with_public_key_modulus("banana")
            .to_cert_key_pair()
    }

    fn merged_apple() -> CertKeyPair {
        new_cert_key_pair()
            .in_cluster("openshift-config", "alpha")
            .in_cluster("openshift-kube-apiserver", "bravo")
            .on_disk_location("/serving.crt", "/serving.key")
            .on_disk_location("/other-serving.crt", "/other-serving.key")
            .with_public_key_modulus("apple")
            .to_cert_key_pair()
    }

    fn merged_banana() -> CertKeyPair {
        new_cert_key_pair()
            .in_cluster("openshift-config", "charlie")
            .in_cluster("openshift-kube-controller-manager", "delta")
            .in_cluster("openshift-config-managed", "echo")
            .on_disk_location("/csr.crt", "/csr.key")
            .with_public_key_modulus("banana")
            .to_cert_key_pair()
    }

    #[test]
    fn test_add_fresh_certs() {
        let incoming = new_pki_list()
            .with_cert(carrot())
            .with_cert(drumstick())
            .with_cert(eggplant())
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "golf")
                    .on_disk_location("/ca.crt")
                    .with_public_key_modulus("carrot")
                    .with_public_key_modulus("fig")
                    .to_ca_bundle(),
            )
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-etcd", "hotel")
                    .on_disk_location("/etcd-ca.crt")
                    .with_public_key_modulus("eggplant")
                    .to_ca_bundle(),
            )
            .to_pki_list();

        let (merged, errors) = merge(&new_pki_list().to_pki_list(), &incoming);

        assert_eq!(merged, incoming);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_merge_and_map_certs() {
        let existing = new_pki_list().with_cert(apple()).with_cert(banana()).to_pki_list();
        let incoming = new_pki_list()
            .with_cert(carrot())
            .with_cert(drumstick())
            .with_cert(eggplant())
            .to_pki_list();

        let (merged, errors) = merge(&existing, &incoming);

        assert_eq!(
            merged,
            new_pki_list()
                .with_cert(merged_apple())
                .with_cert(merged_banana())
                .with_cert(eggplant())
                .to_pki_list()
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_description() {
        let mut existing_apple = apple();
        existing_apple.description = "kube-apiserver serving cert".to_string();
        existing_apple.spec.cert_metadata.cert_identifier.common_name = "kube-apiserver".to_string();
        let mut incoming_carrot = carrot();
        incoming_carrot.description = "found on disk".to_string();

        let (merged, errors) = merge(
            &new_pki_list().with_cert(existing_apple).to_pki_list(),
            &new_pki_list().with_cert(incoming_carrot).to_pki_list(),
        );

        assert!(errors.is_empty());
        let merged_cert = &merged.cert_key_pairs.items[0];
        assert_eq!(merged_cert.description, "kube-apiserver serving cert");
        assert_eq!(merged_cert.identifier().common_name, "kube-apiserver");
        assert_eq!(merged_cert.identifier().pubkey_modulus, "apple");
        assert_eq!(merged_cert.spec.on_disk_locations.len(), 2);
    }

    #[test]
    fn test_merge_and_map_ca_bundles() {
        let existing = new_pki_list()
            .with_cert(apple())
            .with_cert(banana())
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "golf")
                    .in_cluster("openshift-etcd", "hotel")
                    .on_disk_location("/ca.crt")
                    .with_public_key_modulus("apple")
                    .to_ca_bundle(),
            )
            .to_pki_list();

        let incoming = new_pki_list()
            .with_cert(carrot())
            .with_cert(drumstick())
            .with_cert(eggplant())
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "golf")
                    .in_cluster("openshift-etcd", "hotel")
                    .on_disk_location("/ca.crt")
                    .to_ca_bundle(),
            )
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "india")
                    .in_cluster("openshift-etcd", "hotel")
                    .on_disk_location("/ca-bundle.crt")
                    .with_public_key_modulus("carrot")
                    .with_public_key_modulus("eggplant")
                    .to_ca_bundle(),
            )
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "juliet")
                    .with_public_key_modulus("eggplant")
                    .to_ca_bundle(),
            )
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "kilo")
                    .with_public_key_modulus("drumstick")
                    .to_ca_bundle(),
            )
            .to_pki_list();

        let (merged, errors) = merge(&existing, &incoming);

        assert_eq!(
            merged,
            new_pki_list()
                .with_cert(merged_apple())
                .with_cert(merged_banana())
                .with_cert(eggplant())
                .with_ca_bundle(
                    new_ca_bundle()
                        .in_cluster("openshift-config-managed", "golf")
                        .in_cluster("openshift-etcd", "hotel")
                        .in_cluster("openshift-config-managed", "india")
                        .on_disk_location("/ca.crt")
                        .on_disk_location("/ca-bundle.crt")
                        .with_public_key_modulus("apple")
                        .with_public_key_modulus("eggplant")
                        .to_ca_bundle(),
                )
                .with_ca_bundle(
                    new_ca_bundle()
                        .in_cluster("openshift-config-managed", "juliet")
                        .with_public_key_modulus("eggplant")
                        .to_ca_bundle(),
                )
                .with_ca_bundle(
                    // Not known before this fold, its certificate still gets mapped
                    new_ca_bundle()
                        .in_cluster("openshift-config-managed", "kilo")
                        .with_public_key_modulus("banana")
                        .to_ca_bundle(),
                )
                .to_pki_list()
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_merge_empty_list_is_noop() {
        let existing = new_pki_list()
            .with_cert(apple())
            .with_cert(eggplant())
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "golf")
                    .with_public_key_modulus("apple")
                    .to_ca_bundle(),
            )
            .to_pki_list();

        let (merged, errors) = merge(&existing, &PkiList::default());

        assert_eq!(merged, existing);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_merge_conflicting_cert_is_excluded() {
        let existing = new_pki_list().with_cert(apple()).with_cert(banana()).to_pki_list();

        let conflicting = new_cert_key_pair()
            .in_cluster("openshift-config", "alpha")
            .in_cluster("openshift-config", "charlie")
            .with_public_key_modulus("carrot")
            .to_cert_key_pair();

        let (merged, errors) = merge(&existing, &new_pki_list().with_cert(conflicting.clone()).to_pki_list());

        assert_eq!(merged, existing);
        assert_eq!(
            errors,
            vec![MergeError::AmbiguousCertKeyPairLocation {
                incoming: conflicting.to_string(),
                matches: vec![apple().identifier().clone(), banana().identifier().clone()],
            }]
        );
    }

    #[test]
    fn test_merge_ca_bundle_constituent_dedup() {
        let existing = new_pki_list()
            .with_cert(apple())
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "golf")
                    .with_public_key_modulus("apple")
                    .to_ca_bundle(),
            )
            .to_pki_list();

        let incoming = new_pki_list()
            .with_cert(carrot())
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "golf")
                    .with_public_key_modulus("carrot")
                    .with_public_key_modulus("fig")
                    .with_public_key_modulus("fig")
                    .to_ca_bundle(),
            )
            .to_pki_list();

        let (merged, errors) = merge(&existing, &incoming);

        assert!(errors.is_empty());
        assert_eq!(
            merged.certificate_authority_bundles.items,
            vec![new_ca_bundle()
                .in_cluster("openshift-config-managed", "golf")
                .with_public_key_modulus("apple")
                .with_public_key_modulus("fig")
                .to_ca_bundle()]
        );
    }

    #[test]
    fn test_merge_sibling_with_mapped_identifier_is_not_duplicated() {
        let existing = new_pki_list().with_cert(apple()).to_pki_list();

        // The same certificate found twice by one probe, once where the registry already knows
        // it and once somewhere new
        let incoming = new_pki_list()
            .with_cert(
                new_cert_key_pair()
                    .in_cluster("openshift-config", "alpha")
                    .with_public_key_modulus("carrot")
                    .to_cert_key_pair(),
            )
            .with_cert(
                new_cert_key_pair()
                    .on_disk_location("/elsewhere.crt", "/elsewhere.key")
                    .with_public_key_modulus("carrot")
                    .to_cert_key_pair(),
            )
            .to_pki_list();

        let (merged, errors) = merge(&existing, &incoming);

        assert!(errors.is_empty());
        assert_eq!(
            merged.cert_key_pairs.items,
            vec![new_cert_key_pair()
                .in_cluster("openshift-config", "alpha")
                .in_cluster("openshift-kube-apiserver", "bravo")
                .on_disk_location("/serving.crt", "/serving.key")
                .on_disk_location("/elsewhere.crt", "/elsewhere.key")
                .with_public_key_modulus("apple")
                .to_cert_key_pair()]
        );
    }

    #[test]
    fn test_merge_ambiguous_mapping_drops_added_cert() {
        let existing = new_pki_list().with_cert(apple()).with_cert(banana()).to_pki_list();

        // The same certificate seen at apple's location, at banana's location and somewhere new
        let incoming = new_pki_list()
            .with_cert(
                new_cert_key_pair()
                    .in_cluster("openshift-config", "alpha")
                    .with_public_key_modulus("carrot")
                    .to_cert_key_pair(),
            )
            .with_cert(
                new_cert_key_pair()
                    .in_cluster("openshift-config", "charlie")
                    .with_public_key_modulus("carrot")
                    .to_cert_key_pair(),
            )
            .with_cert(
                new_cert_key_pair()
                    .in_cluster("openshift-config", "zulu")
                    .with_public_key_modulus("carrot")
                    .to_cert_key_pair(),
            )
            .to_pki_list();

        let (merged, errors) = merge(&existing, &incoming);

        assert_eq!(
            errors,
            vec![MergeError::AmbiguousIdentifierMapping {
                identifier: carrot().identifier().clone(),
                candidates: vec![apple().identifier().clone(), banana().identifier().clone()],
            }]
        );
        assert_eq!(merged.cert_key_pairs.items, vec![apple(), banana()]);
    }

    #[test]
    fn test_merge_ambiguous_mapping_drops_constituent() {
        let existing = new_pki_list().with_cert(apple()).with_cert(banana()).to_pki_list();

        // One certificate seen at apple's location and, separately, at banana's location
        let incoming = new_pki_list()
            .with_cert(
                new_cert_key_pair()
                    .in_cluster("openshift-config", "alpha")
                    .with_public_key_modulus("carrot")
                    .to_cert_key_pair(),
            )
            .with_cert(
                new_cert_key_pair()
                    .in_cluster("openshift-config", "charlie")
                    .with_public_key_modulus("carrot")
                    .to_cert_key_pair(),
            )
            .with_ca_bundle(
                new_ca_bundle()
                    .in_cluster("openshift-config-managed", "golf")
                    .with_public_key_modulus("carrot")
                    .with_public_key_modulus("eggplant")
                    .to_ca_bundle(),
            )
            .to_pki_list();

        let (merged, errors) = merge(&existing, &incoming);

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], MergeError::AmbiguousIdentifierMapping { .. }));
        assert_eq!(
            merged.certificate_authority_bundles.items,
            vec![new_ca_bundle()
                .in_cluster("openshift-config-managed", "golf")
                .with_public_key_modulus("eggplant")
                .to_ca_bundle()]
        );
    }
}
