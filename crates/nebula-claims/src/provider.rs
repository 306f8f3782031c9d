use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::{
    builder::{build_claims, ClaimSet},
    error::Result,
    loader::RuleSetLoader,
    matcher::find_match,
    rule::RuleSet,
    user::UserRecord,
};

pub trait ClaimsProvider: Send + Sync {
    fn claims(&self, user: &UserRecord) -> Result<ClaimSet>;
}

/// Outcome of evaluating one user against the current rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub matched_rule: Option<usize>,
    pub claims: ClaimSet,
}

/// Shapes claims for users from a rule set that is loaded up front and can be swapped at runtime.
///
/// Readers always see one complete rule set: a reload publishes a new snapshot and never
/// touches the one in-flight callers already hold.
pub struct UserClaimsProvider {
    loader: Box<dyn RuleSetLoader>,
    rules: ArcSwap<RuleSet>,
}

impl UserClaimsProvider {
    pub fn new(loader: impl RuleSetLoader + 'static) -> Result<Self> {
        let rules = loader.load()?;
        Ok(Self { loader: Box::new(loader), rules: ArcSwap::from_pointee(rules) })
    }

    pub fn rules(&self) -> Arc<RuleSet> {
        self.rules.load_full()
    }

    pub fn evaluate(&self, user: &UserRecord) -> Evaluation {
        let rules = self.rules.load();
        let matched = find_match(&rules, user);
        match matched {
            Some((index, _)) => debug!("user(sub: {}) matched claims rule #{index}", user.sub),
            None => debug!("user(sub: {}) matched no claims rule, applying default claims", user.sub),
        }

        Evaluation { matched_rule: matched.map(|(index, _)| index), claims: build_claims(user, matched.map(|(_, rule)| rule)) }
    }

    pub fn claims_for_user(&self, user: &UserRecord) -> ClaimSet {
        self.evaluate(user).claims
    }

    /// Loads the rules again and publishes them. On failure the current rules stay in place.
    pub fn reload(&self) -> Result<usize> {
        match self.loader.load() {
            Ok(rules) => {
                let count = rules.len();
                self.rules.store(Arc::new(rules));
                Ok(count)
            }
            Err(error) => {
                warn!("failed to reload user claims rules, keeping the previous ones: {error}");
                Err(error)
            }
        }
    }
}

impl ClaimsProvider for UserClaimsProvider {
    fn claims(&self, user: &UserRecord) -> Result<ClaimSet> {
        Ok(self.claims_for_user(user))
    }
}
