use std::collections::{BTreeMap, BTreeSet};

use bon::Builder;
use serde::Deserialize;

use crate::{
    scalar::{scalar_string, scalar_string_set},
    user::UserRecord,
    value::ClaimValue,
};

pub(crate) const RULE_FIELDS: &[&str] = &["sub", "origin", "email", "domain", "groups", "claims"];

/// An override record. Empty string fields and an empty group set are wildcards.
#[derive(Builder, Deserialize, Debug, Clone, Default, PartialEq)]
#[builder(on(String, into))]
#[serde(default)]
pub struct Rule {
    #[builder(default)]
    #[serde(deserialize_with = "scalar_string")]
    pub sub: String,
    #[builder(default)]
    #[serde(deserialize_with = "scalar_string")]
    pub origin: String,
    #[builder(default)]
    #[serde(deserialize_with = "scalar_string")]
    pub email: String,
    #[builder(default)]
    #[serde(deserialize_with = "scalar_string")]
    pub domain: String,
    #[builder(default)]
    #[serde(deserialize_with = "scalar_string_set")]
    pub groups: BTreeSet<String>,
    #[builder(default)]
    #[serde(rename = "claims")]
    pub overrides: BTreeMap<String, ClaimValue>,
}

impl Rule {
    pub fn matches(&self, user: &UserRecord) -> bool {
        field_matches(&self.sub, &user.sub)
            && field_matches(&self.domain, &user.domain)
            && field_matches(&self.email, &user.email)
            && field_matches(&self.origin, &user.origin)
            && (self.groups.is_empty() || user.in_any_group(&self.groups))
    }
}

#[inline]
fn field_matches(expected: &str, actual: &str) -> bool {
    expected.is_empty() || expected == actual
}

/// Ordered, immutable list of rules. List order decides which rule wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
