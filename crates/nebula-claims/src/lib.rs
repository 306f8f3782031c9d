pub mod builder;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod provider;
pub mod rule;
mod scalar;
pub mod user;
pub mod value;

pub use builder::{build_claims, ClaimSet, DefaultRoleClaim, DEFAULT_ROLE_CLAIM_KEY};
pub use error::ClaimsError;
pub use loader::{FileRuleSetLoader, RuleSetLoader};
pub use matcher::{find_match, match_rule};
pub use provider::{ClaimsProvider, Evaluation, UserClaimsProvider};
pub use rule::{Rule, RuleSet};
pub use user::UserRecord;
pub use value::ClaimValue;
