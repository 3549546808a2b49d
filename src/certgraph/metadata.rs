use super::identifier::CertIdentifier;
use serde::{Deserialize, Serialize};

/// Descriptive information about a single certificate. The merge engine only ever looks at (and
/// rewrites) the identifier, everything else is carried through untouched for the documentation
/// and ownership consumers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CertKeyMetadata {
    pub(crate) cert_identifier: CertIdentifier,
    pub(crate) signature_algorithm: String,
    pub(crate) public_key_algorithm: String,
    pub(crate) public_key_bit_size: i64,
    pub(crate) validity_duration: String,
    pub(crate) usages: Vec<String>,
    pub(crate) extended_usages: Vec<String>,
}

impl CertKeyMetadata {
    pub(crate) fn with_identifier(&self, cert_identifier: CertIdentifier) -> Self {
        Self {
            cert_identifier,
            ..self.clone()
        }
    }
}

/// What kind of certificate a cert/key pair holds. A certificate may be several kinds at once
/// (e.g. a signer that also serves).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CertKeyPairDetails {
    pub(crate) cert_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) signer_details: Option<SignerCertDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) serving_cert_details: Option<ServingCertDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) client_cert_details: Option<ClientCertDetails>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SignerCertDetails {}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ServingCertDetails {
    pub(crate) dns_names: Vec<String>,
    pub(crate) ip_addresses: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct ClientCertDetails {
    pub(crate) organizations: Vec<String>,
}
