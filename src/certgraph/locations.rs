use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, hash::Hash};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(default)]
pub(crate) struct InClusterSecretLocation {
    pub(crate) namespace: String,
    pub(crate) name: String,
}

impl Display for InClusterSecretLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "secret/{}:{}", self.namespace, self.name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(default)]
pub(crate) struct InClusterConfigMapLocation {
    pub(crate) namespace: String,
    pub(crate) name: String,
}

impl Display for InClusterConfigMapLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configmap/{}:{}", self.namespace, self.name)
    }
}

/// A file on a node. Only the path identifies the location, ownership and permissions are
/// descriptive.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct OnDiskLocation {
    pub(crate) path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) group: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) permissions: String,
    #[serde(rename = "selinuxOptions", skip_serializing_if = "String::is_empty")]
    pub(crate) selinux_options: String,
}

impl OnDiskLocation {
    #[cfg(test)]
    pub(crate) fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    /// Whether both locations point at the same file. A location without a path points nowhere
    /// and never matches anything.
    pub(crate) fn same_path(&self, other: &OnDiskLocation) -> bool {
        !self.path.is_empty() && self.path == other.path
    }
}

impl Display for OnDiskLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file:{}", self.path)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct OnDiskCertKeyPairLocation {
    pub(crate) cert: OnDiskLocation,
    pub(crate) key: OnDiskLocation,
}

impl OnDiskCertKeyPairLocation {
    #[cfg(test)]
    pub(crate) fn new(cert_path: &str, key_path: &str) -> Self {
        Self {
            cert: OnDiskLocation::new(cert_path),
            key: OnDiskLocation::new(key_path),
        }
    }

    /// The cert files and the key files are compared independently of each other
    pub(crate) fn shares_file_with(&self, other: &OnDiskCertKeyPairLocation) -> bool {
        self.cert.same_path(&other.cert) || self.key.same_path(&other.key)
    }

    fn paths(&self) -> (String, String) {
        (self.cert.path.clone(), self.key.path.clone())
    }
}

impl Display for OnDiskCertKeyPairLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cert {} key {}", self.cert, self.key)
    }
}

/// Concatenates both location lists, keeping only the first occurrence of every location as
/// identified by `key`. Existing locations keep their position.
fn union_by<'a, T, K, F>(existing: &'a [T], incoming: &'a [T], key: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: FnMut(&&'a T) -> K,
{
    existing.iter().chain(incoming.iter()).unique_by(key).cloned().collect()
}

pub(crate) fn union_secret_locations(existing: &[InClusterSecretLocation], incoming: &[InClusterSecretLocation]) -> Vec<InClusterSecretLocation> {
    union_by(existing, incoming, |location| (*location).clone())
}

pub(crate) fn union_config_map_locations(
    existing: &[InClusterConfigMapLocation],
    incoming: &[InClusterConfigMapLocation],
) -> Vec<InClusterConfigMapLocation> {
    union_by(existing, incoming, |location| (*location).clone())
}

pub(crate) fn union_cert_key_pair_on_disk_locations(
    existing: &[OnDiskCertKeyPairLocation],
    incoming: &[OnDiskCertKeyPairLocation],
) -> Vec<OnDiskCertKeyPairLocation> {
    union_by(existing, incoming, |location| location.paths())
}

pub(crate) fn union_on_disk_locations(existing: &[OnDiskLocation], incoming: &[OnDiskLocation]) -> Vec<OnDiskLocation> {
    union_by(existing, incoming, |location| location.path.clone())
}
