use serde::{Deserialize, Serialize};

/// The fingerprint a probe records for a single certificate.
///
/// Identity is self-contained: two identifiers denote the same certificate when their common
/// name, serial number and public key modulus agree (see [`identifier_matches`]). The issuer is
/// only carried along for documentation purposes, probes frequently see incomplete issuer chains
/// for what is otherwise the same certificate.
///
/// Note that the derived `PartialEq` is plain structural equality (issuer included), use
/// [`CertIdentifier::matches`] whenever identity is what's being asked.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct CertIdentifier {
    pub(crate) common_name: String,
    pub(crate) serial_number: String,
    pub(crate) pubkey_modulus: String,
    pub(crate) issuer: Option<Box<CertIdentifier>>,
}

impl CertIdentifier {
    pub(crate) fn matches(&self, other: &CertIdentifier) -> bool {
        identifier_matches(self, other)
    }
}

pub(crate) fn identifier_matches(a: &CertIdentifier, b: &CertIdentifier) -> bool {
    a.pubkey_modulus == b.pubkey_modulus && a.common_name == b.common_name && a.serial_number == b.serial_number
}

impl std::fmt::Display for CertIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[CN={}, serial={}, modulus={}]",
            self.common_name,
            self.serial_number,
            abbreviate_modulus(&self.pubkey_modulus)
        )
    }
}

// Real moduli are hundreds of hex characters long, which drowns out everything else in an error
// message
fn abbreviate_modulus(modulus: &str) -> String {
    const MAX_DISPLAYED: usize = 16;

    if modulus.chars().count() <= MAX_DISPLAYED {
        modulus.to_string()
    } else {
        format!("{}...", modulus.chars().take(MAX_DISPLAYED).collect::<String>())
    }
}
