use super::errors::MergeError;
use crate::certgraph::identifier::CertIdentifier;

/// Any artifact whose identifier matches `from_value` is to be treated as `to_value` for the rest
/// of the current fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CertIdentifierMapping {
    pub(crate) from_value: CertIdentifier,
    pub(crate) to_value: CertIdentifier,
}

/// The identifier rewrites discovered while categorizing the cert/key pairs of a single fold.
/// A fresh table is built for every fold, it is never carried over to the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CertIdentifierMappings {
    pub(crate) mappings: Vec<CertIdentifierMapping>,
}

impl CertIdentifierMappings {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, from_value: &CertIdentifier, to_value: &CertIdentifier) {
        self.mappings.push(CertIdentifierMapping {
            from_value: from_value.clone(),
            to_value: to_value.clone(),
        });
    }

    /// Rewrites `identifier` to its canonical form. Identifiers nobody mapped are returned
    /// unchanged. Mapping the same identifier to two different targets is an error.
    pub(crate) fn map(&self, identifier: &CertIdentifier) -> Result<CertIdentifier, MergeError> {
        let mut targets: Vec<&CertIdentifier> = vec![];

        for mapping in self.mappings.iter().filter(|mapping| mapping.from_value.matches(identifier)) {
            if !targets.iter().any(|target| target.matches(&mapping.to_value)) {
                targets.push(&mapping.to_value);
            }
        }

        match targets.as_slice() {
            [] => Ok(identifier.clone()),
            [target] => Ok((*target).clone()),
            _ => Err(MergeError::AmbiguousIdentifierMapping {
                identifier: identifier.clone(),
                candidates: targets.into_iter().cloned().collect(),
            }),
        }
    }
}
