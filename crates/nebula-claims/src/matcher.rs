use crate::{
    rule::{Rule, RuleSet},
    user::UserRecord,
};

/// Returns the first rule in list order that matches `user`.
///
/// Scanning stops at the first candidate, so an earlier, broader rule shadows every later
/// rule it overlaps with, however specific. `None` is the normal "use defaults" outcome.
pub fn match_rule<'a>(rules: &'a RuleSet, user: &UserRecord) -> Option<&'a Rule> {
    find_match(rules, user).map(|(_, rule)| rule)
}

/// Same as [`match_rule`], also reporting the position of the matched rule.
pub fn find_match<'a>(rules: &'a RuleSet, user: &UserRecord) -> Option<(usize, &'a Rule)> {
    rules.iter().enumerate().find(|(_, rule)| rule.matches(user))
}
