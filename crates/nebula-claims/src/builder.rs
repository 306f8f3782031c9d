use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{rule::Rule, user::UserRecord, value::ClaimValue};

pub const SUB_CLAIM: &str = "sub";
pub const ORIGIN_CLAIM: &str = "origin";
pub const EMAIL_CLAIM: &str = "email";
pub const DOMAIN_CLAIM: &str = "domain";
pub const GROUPS_CLAIM: &str = "groups";

pub const DEFAULT_ROLE_CLAIM_KEY: &str = "https://hasura.io/jwt/claims";
pub const DEFAULT_ROLE_KEY: &str = "x-hasura-default-role";
pub const ALLOWED_ROLES_KEY: &str = "x-hasura-allowed-roles";

/// Namespaced role claim applied when no rule matches a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoleClaim {
    pub default_role: String,
    pub allowed_roles: Vec<String>,
}

impl Default for DefaultRoleClaim {
    fn default() -> Self {
        Self {
            default_role: "admin".to_owned(),
            allowed_roles: ["editor", "user", "mod", "admin"].into_iter().map(str::to_owned).collect(),
        }
    }
}

impl From<DefaultRoleClaim> for ClaimValue {
    fn from(claim: DefaultRoleClaim) -> Self {
        ClaimValue::Map(BTreeMap::from([
            (DEFAULT_ROLE_KEY.to_owned(), ClaimValue::String(claim.default_role)),
            (ALLOWED_ROLES_KEY.to_owned(), ClaimValue::from(claim.allowed_roles)),
        ]))
    }
}

/// Final claims for one user, ready to be handed to a token issuer.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ClaimSet(BTreeMap<String, ClaimValue>);

impl ClaimSet {
    pub fn get(&self, key: &str) -> Option<&ClaimValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json_map(&self) -> Map<String, Value> {
        self.0.iter().map(|(k, v)| (k.clone(), Value::from(v.clone()))).collect()
    }

    /// Shallow merge: every key in `overrides` replaces the existing value outright.
    fn merge<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a String, &'a ClaimValue)>) {
        for (key, value) in overrides {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl From<&UserRecord> for ClaimSet {
    fn from(user: &UserRecord) -> Self {
        Self(BTreeMap::from([
            (SUB_CLAIM.to_owned(), ClaimValue::from(user.sub.as_str())),
            (ORIGIN_CLAIM.to_owned(), ClaimValue::from(user.origin.as_str())),
            (EMAIL_CLAIM.to_owned(), ClaimValue::from(user.email.as_str())),
            (DOMAIN_CLAIM.to_owned(), ClaimValue::from(user.domain.as_str())),
            (GROUPS_CLAIM.to_owned(), ClaimValue::List(user.groups.iter().map(|g| ClaimValue::from(g.as_str())).collect())),
        ]))
    }
}

/// Builds the claims for `user`, applying the matched rule's overrides or, without a match,
/// the [`DefaultRoleClaim`].
pub fn build_claims(user: &UserRecord, matched: Option<&Rule>) -> ClaimSet {
    let mut claims = ClaimSet::from(user);
    match matched {
        Some(rule) => claims.merge(&rule.overrides),
        None => {
            claims.0.insert(DEFAULT_ROLE_CLAIM_KEY.to_owned(), DefaultRoleClaim::default().into());
        }
    }
    claims
}
