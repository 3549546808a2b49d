use crate::certgraph::{
    identifier::CertIdentifier,
    locations::{InClusterConfigMapLocation, InClusterSecretLocation, OnDiskCertKeyPairLocation, OnDiskLocation},
    metadata::CertKeyMetadata,
    CertKeyPair, CertificateAuthorityBundle, PkiList,
};

pub(crate) fn new_pki_list() -> PkiListBuilder {
    PkiListBuilder::default()
}

pub(crate) fn new_cert_key_pair() -> CertKeyPairBuilder {
    CertKeyPairBuilder::default()
}

pub(crate) fn new_ca_bundle() -> CaBundleBuilder {
    CaBundleBuilder::default()
}

#[derive(Default)]
pub(crate) struct PkiListBuilder {
    pki_list: PkiList,
}

impl PkiListBuilder {
    pub(crate) fn with_cert(mut self, cert_key_pair: CertKeyPair) -> Self {
        self.pki_list.cert_key_pairs.items.push(cert_key_pair);
        self
    }

    pub(crate) fn with_ca_bundle(mut self, ca_bundle: CertificateAuthorityBundle) -> Self {
        self.pki_list.certificate_authority_bundles.items.push(ca_bundle);
        self
    }

    pub(crate) fn to_pki_list(&self) -> PkiList {
        self.pki_list.clone()
    }
}

#[derive(Default)]
pub(crate) struct CertKeyPairBuilder {
    cert_key_pair: CertKeyPair,
}

impl CertKeyPairBuilder {
    pub(crate) fn in_cluster(mut self, namespace: &str, name: &str) -> Self {
        self.cert_key_pair.spec.secret_locations.push(InClusterSecretLocation {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub(crate) fn on_disk_location(mut self, cert_path: &str, key_path: &str) -> Self {
        self.cert_key_pair
            .spec
            .on_disk_locations
            .push(OnDiskCertKeyPairLocation::new(cert_path, key_path));
        self
    }

    pub(crate) fn with_public_key_modulus(mut self, pubkey_modulus: &str) -> Self {
        self.cert_key_pair.spec.cert_metadata.cert_identifier.pubkey_modulus = pubkey_modulus.to_string();
        self
    }

    pub(crate) fn to_cert_key_pair(&self) -> CertKeyPair {
        self.cert_key_pair.clone()
    }
}

#[derive(Default)]
pub(crate) struct CaBundleBuilder {
    ca_bundle: CertificateAuthorityBundle,
}

impl CaBundleBuilder {
    pub(crate) fn in_cluster(mut self, namespace: &str, name: &str) -> Self {
        self.ca_bundle.spec.config_map_locations.push(InClusterConfigMapLocation {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub(crate) fn on_disk_location(mut self, path: &str) -> Self {
        self.ca_bundle.spec.on_disk_locations.push(OnDiskLocation::new(path));
        self
    }

    /// Adds one more bundled certificate
    pub(crate) fn with_public_key_modulus(mut self, pubkey_modulus: &str) -> Self {
        self.ca_bundle.spec.certificate_metadata.push(CertKeyMetadata {
            cert_identifier: CertIdentifier {
                pubkey_modulus: pubkey_modulus.to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        self
    }

    pub(crate) fn to_ca_bundle(&self) -> CertificateAuthorityBundle {
        self.ca_bundle.clone()
    }
}
