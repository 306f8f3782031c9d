use std::collections::BTreeSet;

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Normalized identity attributes handed over by the upstream identity layer.
///
/// The record is trusted as-is; establishing that it is authentic happens before it gets here.
#[derive(Builder, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[builder(on(String, into))]
#[serde(default)]
pub struct UserRecord {
    #[builder(default)]
    pub sub: String,
    #[builder(default)]
    pub origin: String,
    #[builder(default)]
    pub email: String,
    #[builder(default)]
    pub domain: String,
    #[builder(default)]
    pub groups: BTreeSet<String>,
}

impl UserRecord {
    pub fn in_any_group(&self, groups: &BTreeSet<String>) -> bool {
        !self.groups.is_disjoint(groups)
    }
}
