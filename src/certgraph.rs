//! The PKI List document model. A PKI List is what a single probe (an in-cluster scan, an
//! on-disk scan, ...) reports: every cert/key pair and every CA bundle it found, and where it
//! found them. The JSON field names follow the raw-data documents the probes produce, so lists
//! round-trip through serde unchanged.

use self::{
    identifier::CertIdentifier,
    locations::{
        union_cert_key_pair_on_disk_locations, union_config_map_locations, union_on_disk_locations, union_secret_locations,
        InClusterConfigMapLocation, InClusterSecretLocation, OnDiskCertKeyPairLocation, OnDiskLocation,
    },
    metadata::{CertKeyMetadata, CertKeyPairDetails},
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub(crate) mod identifier;
pub(crate) mod locations;
pub(crate) mod metadata;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PkiList {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) logical_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) description: String,
    pub(crate) certificate_authority_bundles: CertificateAuthorityBundleList,
    pub(crate) cert_key_pairs: CertKeyPairList,
}

impl PkiList {
    /// A copy of this list in which no entry claims the same location twice
    pub(crate) fn with_deduplicated_locations(&self) -> Self {
        Self {
            certificate_authority_bundles: CertificateAuthorityBundleList {
                items: self
                    .certificate_authority_bundles
                    .items
                    .iter()
                    .map(CertificateAuthorityBundle::with_deduplicated_locations)
                    .collect(),
            },
            cert_key_pairs: CertKeyPairList {
                items: self
                    .cert_key_pairs
                    .items
                    .iter()
                    .map(CertKeyPair::with_deduplicated_locations)
                    .collect(),
            },
            ..self.clone()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct CertKeyPairList {
    pub(crate) items: Vec<CertKeyPair>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct CertificateAuthorityBundleList {
    pub(crate) items: Vec<CertificateAuthorityBundle>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CertKeyPair {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) logical_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) description: String,
    pub(crate) name: String,
    pub(crate) spec: CertKeyPairSpec,
    pub(crate) status: ArtifactStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CertKeyPairSpec {
    pub(crate) secret_locations: Vec<InClusterSecretLocation>,
    pub(crate) on_disk_locations: Vec<OnDiskCertKeyPairLocation>,
    pub(crate) cert_metadata: CertKeyMetadata,
    pub(crate) details: CertKeyPairDetails,
}

/// Problems a probe ran into while inspecting an artifact
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct ArtifactStatus {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) errors: Vec<String>,
}

impl CertKeyPair {
    pub(crate) fn identifier(&self) -> &CertIdentifier {
        &self.spec.cert_metadata.cert_identifier
    }

    pub(crate) fn with_identifier(&self, cert_identifier: CertIdentifier) -> Self {
        let mut cert_key_pair = self.clone();
        cert_key_pair.spec.cert_metadata.cert_identifier = cert_identifier;
        cert_key_pair
    }

    /// A copy of this pair which additionally claims all of `other`'s locations. Everything but
    /// the locations (identifier, description, metadata) stays ours.
    pub(crate) fn with_locations_from(&self, other: &CertKeyPair) -> Self {
        let mut cert_key_pair = self.clone();
        cert_key_pair.spec.secret_locations = union_secret_locations(&self.spec.secret_locations, &other.spec.secret_locations);
        cert_key_pair.spec.on_disk_locations =
            union_cert_key_pair_on_disk_locations(&self.spec.on_disk_locations, &other.spec.on_disk_locations);
        cert_key_pair
    }

    pub(crate) fn with_deduplicated_locations(&self) -> Self {
        self.with_locations_from(&CertKeyPair::default())
    }

    pub(crate) fn shares_location_with(&self, other: &CertKeyPair) -> bool {
        self.spec
            .secret_locations
            .iter()
            .any(|secret_location| other.spec.secret_locations.contains(secret_location))
            || self.spec.on_disk_locations.iter().any(|on_disk_location| {
                other
                    .spec
                    .on_disk_locations
                    .iter()
                    .any(|other_on_disk_location| on_disk_location.shares_file_with(other_on_disk_location))
            })
    }
}

impl Display for CertKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cert/key pair {} at [{}]",
            self.identifier(),
            self.spec
                .secret_locations
                .iter()
                .map(ToString::to_string)
                .chain(self.spec.on_disk_locations.iter().map(ToString::to_string))
                .join(", ")
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CertificateAuthorityBundle {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) logical_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) description: String,
    pub(crate) name: String,
    pub(crate) spec: CertificateAuthorityBundleSpec,
    pub(crate) status: ArtifactStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CertificateAuthorityBundleSpec {
    pub(crate) config_map_locations: Vec<InClusterConfigMapLocation>,
    pub(crate) on_disk_locations: Vec<OnDiskLocation>,
    /// One entry per bundled certificate, at most one per public key modulus
    #[serde(rename = "certificates")]
    pub(crate) certificate_metadata: Vec<CertKeyMetadata>,
}

impl CertificateAuthorityBundle {
    pub(crate) fn identifiers(&self) -> impl Iterator<Item = &CertIdentifier> {
        self.spec.certificate_metadata.iter().map(|metadata| &metadata.cert_identifier)
    }

    /// Bundles have no identifier of their own, two bundles are the same when each one contains
    /// every certificate of the other.
    pub(crate) fn same_certificates_as(&self, other: &CertificateAuthorityBundle) -> bool {
        let contains_all = |container: &CertificateAuthorityBundle, contained: &CertificateAuthorityBundle| {
            contained
                .identifiers()
                .all(|identifier| container.identifiers().any(|candidate| candidate.matches(identifier)))
        };

        contains_all(self, other) && contains_all(other, self)
    }

    pub(crate) fn contains_pubkey_modulus(&self, pubkey_modulus: &str) -> bool {
        self.identifiers().any(|identifier| identifier.pubkey_modulus == pubkey_modulus)
    }

    /// A copy of this bundle which additionally claims all of `other`'s locations. The bundled
    /// certificates are left alone, see the merge engine for how those are combined.
    pub(crate) fn with_locations_from(&self, other: &CertificateAuthorityBundle) -> Self {
        let mut bundle = self.clone();
        bundle.spec.config_map_locations = union_config_map_locations(&self.spec.config_map_locations, &other.spec.config_map_locations);
        bundle.spec.on_disk_locations = union_on_disk_locations(&self.spec.on_disk_locations, &other.spec.on_disk_locations);
        bundle
    }

    pub(crate) fn with_deduplicated_locations(&self) -> Self {
        let mut bundle = self.with_locations_from(&CertificateAuthorityBundle::default());
        bundle.spec.certificate_metadata = self
            .spec
            .certificate_metadata
            .iter()
            .unique_by(|metadata| metadata.cert_identifier.pubkey_modulus.clone())
            .cloned()
            .collect();
        bundle
    }

    pub(crate) fn shares_location_with(&self, other: &CertificateAuthorityBundle) -> bool {
        self.spec
            .config_map_locations
            .iter()
            .any(|config_map_location| other.spec.config_map_locations.contains(config_map_location))
            || self.spec.on_disk_locations.iter().any(|on_disk_location| {
                other
                    .spec
                    .on_disk_locations
                    .iter()
                    .any(|other_on_disk_location| on_disk_location.same_path(other_on_disk_location))
            })
    }
}

impl Display for CertificateAuthorityBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CA bundle{} at [{}] with {} certificate(s)",
            if self.name.is_empty() {
                String::new()
            } else {
                format!(" {}", self.name)
            },
            self.spec
                .config_map_locations
                .iter()
                .map(ToString::to_string)
                .chain(self.spec.on_disk_locations.iter().map(ToString::to_string))
                .join(", "),
            self.spec.certificate_metadata.len()
        )
    }
}
