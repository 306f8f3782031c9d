use std::{
    fmt,
    path::{Path, PathBuf},
};

use bon::Builder;
#[cfg(test)]
use mockall::automock;
use serde::{
    de::{IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer,
};
use tracing::info;

use crate::{
    error::{ClaimsError, Result},
    rule::{Rule, RuleSet, RULE_FIELDS},
    scalar::ScalarString,
};

#[cfg_attr(test, automock)]
pub trait RuleSetLoader: Send + Sync {
    fn load(&self) -> Result<RuleSet>;
}

/// Loads rules from a YAML file holding a sequence of rule records.
///
/// No path means no rules. Unknown rule fields are ignored unless `strict` is set.
#[derive(Builder, Debug, Clone)]
pub struct FileRuleSetLoader {
    path: Option<PathBuf>,
    #[builder(default)]
    strict: bool,
}

impl FileRuleSetLoader {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl RuleSetLoader for FileRuleSetLoader {
    fn load(&self) -> Result<RuleSet> {
        let Some(path) = &self.path else {
            info!("no user claims file configured, using default claims only");
            return Ok(RuleSet::empty());
        };

        let contents =
            std::fs::read_to_string(path).map_err(|source| ClaimsError::ConfigRead { path: path.clone(), source })?;
        let rules = parse_rules(&contents, path, self.strict)?;

        info!("loaded {} user claim rule(s) from {}", rules.len(), path.display());
        Ok(rules)
    }
}

pub fn parse_rules(contents: &str, path: &Path, strict: bool) -> Result<RuleSet> {
    if contents.trim().is_empty() {
        return Ok(RuleSet::empty());
    }

    let parse_error = |source| ClaimsError::ConfigParse { path: path.to_path_buf(), source };
    let rules: Option<Vec<Rule>> = serde_yaml::from_str(contents).map_err(parse_error)?;
    let Some(rules) = rules else {
        return Ok(RuleSet::empty());
    };

    if strict {
        let entries: Option<Vec<RuleFieldNames>> = serde_yaml::from_str(contents).map_err(parse_error)?;
        check_unknown_fields(entries.unwrap_or_default(), path)?;
    }

    Ok(RuleSet::new(rules))
}

fn check_unknown_fields(entries: Vec<RuleFieldNames>, path: &Path) -> Result<()> {
    for (index, entry) in entries.into_iter().enumerate() {
        if let Some(field) = entry.0.into_iter().find(|field| !RULE_FIELDS.contains(&field.as_str())) {
            return Err(ClaimsError::UnknownRuleField { path: path.to_path_buf(), index, field });
        }
    }
    Ok(())
}

/// Field names of one rule record in file order, values skipped.
struct RuleFieldNames(Vec<String>);

impl<'de> Deserialize<'de> for RuleFieldNames {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldNamesVisitor;

        impl<'de> Visitor<'de> for FieldNamesVisitor {
            type Value = RuleFieldNames;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a rule record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut names = Vec::new();
                while let Some(ScalarString(name)) = map.next_key()? {
                    map.next_value::<IgnoredAny>()?;
                    names.push(name);
                }
                Ok(RuleFieldNames(names))
            }
        }

        deserializer.deserialize_map(FieldNamesVisitor)
    }
}

#[cfg(test)]
mod test {
    use std::{io::Write as _, path::Path};

    use maplit::btreeset;
    use tempfile::NamedTempFile;

    use super::{parse_rules, FileRuleSetLoader, RuleSetLoader};
    use crate::{error::ClaimsError, value::ClaimValue};

    const RULES: &str = r#"
- sub: "u1"
  claims:
    role: superadmin
- domain: example.com
  groups: [admin, ops]
  claims:
    https://hasura.io/jwt/claims:
      x-hasura-default-role: user
      x-hasura-allowed-roles: [user]
- origin: google
"#;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("creating temp file should be successful");
        file.write_all(contents.as_bytes()).expect("writing temp file should be successful");
        file
    }

    #[test]
    fn when_no_path_is_configured_then_rule_set_is_empty() {
        let loader = FileRuleSetLoader::builder().build();

        let rules = loader.load().expect("loading without a path should be successful");

        assert!(rules.is_empty());
    }

    #[test]
    fn when_file_is_valid_then_rules_keep_file_order() {
        let file = write_file(RULES);
        let loader = FileRuleSetLoader::builder().path(file.path().to_path_buf()).build();

        let rules = loader.load().expect("loading rules should be successful");

        assert_eq!(rules.len(), 3);
        let first = rules.get(0).expect("first rule should exist");
        assert_eq!(first.sub, "u1");
        assert_eq!(first.overrides["role"], ClaimValue::from("superadmin"));
        let second = rules.get(1).expect("second rule should exist");
        assert_eq!(second.domain, "example.com");
        assert_eq!(second.groups, btreeset! { "admin".to_owned(), "ops".to_owned() });
        assert!(second.overrides["https://hasura.io/jwt/claims"].as_map().is_some());
        let third = rules.get(2).expect("third rule should exist");
        assert_eq!(third.origin, "google");
        assert!(third.overrides.is_empty());
        assert!(third.groups.is_empty());
    }

    #[test]
    fn when_file_is_empty_or_null_then_rule_set_is_empty() {
        for contents in ["", "   \n", "~\n", "[]\n", "# comment\n"] {
            let rules = parse_rules(contents, Path::new("users.yaml"), true).expect("parsing should be successful");
            assert!(rules.is_empty(), "{contents:?} should yield no rules");
        }
    }

    #[test]
    fn when_file_does_not_exist_then_config_read_error_names_the_path() {
        let loader = FileRuleSetLoader::builder().path("/nonexistent/nebula/users.yaml".into()).build();

        let error = loader.load().expect_err("loading a missing file should fail");

        assert!(matches!(error, ClaimsError::ConfigRead { .. }));
        assert!(error.to_string().contains("/nonexistent/nebula/users.yaml"));
    }

    #[test]
    fn when_file_is_not_a_rule_list_then_config_parse_error_is_returned() {
        let file = write_file("sub: u1\nclaims: {}\n");
        let loader = FileRuleSetLoader::builder().path(file.path().to_path_buf()).build();

        let error = loader.load().expect_err("loading a mapping should fail");

        assert!(matches!(error, ClaimsError::ConfigParse { ref path, .. } if path == file.path()));
    }

    #[test]
    fn when_groups_has_wrong_type_then_config_parse_error_is_returned() {
        let result = parse_rules("- groups: 3\n", Path::new("users.yaml"), false);

        assert!(matches!(result, Err(ClaimsError::ConfigParse { .. })));
    }

    #[test]
    fn when_unknown_field_is_present_and_not_strict_then_it_is_ignored() {
        let rules = parse_rules("- sub: u1\n  role: admin\n", Path::new("users.yaml"), false)
            .expect("lenient parsing should be successful");

        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get(0).map(|rule| rule.sub.as_str()), Some("u1"));
    }

    #[test]
    fn when_unknown_field_is_present_and_strict_then_load_fails() {
        let result = parse_rules("- sub: u1\n- sub: u2\n  role: admin\n", Path::new("users.yaml"), true);

        match result {
            Err(ClaimsError::UnknownRuleField { index, field, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "role");
            }
            other => panic!("expected unknown field error, got {other:?}"),
        }
    }

    #[test]
    fn when_string_field_is_null_then_it_is_a_wildcard() {
        let rules = parse_rules("- domain: example.com\n  sub:\n  claims:\n    role: x\n", Path::new("users.yaml"), true)
            .expect("null field should be accepted");

        let rule = rules.get(0).expect("rule should exist");
        assert_eq!(rule.sub, "");
        assert_eq!(rule.domain, "example.com");
    }

    #[test]
    fn when_string_fields_are_unquoted_scalars_then_their_text_is_used() {
        let rules = parse_rules(
            "- sub: 12345\n  origin: true\n  email: 1.5\n- sub: 110169484474386276334\n  origin: google\n",
            Path::new("users.yaml"),
            true,
        )
        .expect("numeric and boolean scalars should be accepted");

        let first = rules.get(0).expect("first rule should exist");
        assert_eq!(first.sub, "12345");
        assert_eq!(first.origin, "true");
        assert_eq!(first.email, "1.5");
        assert_eq!(rules.get(1).map(|rule| rule.sub.as_str()), Some("110169484474386276334"));
    }

    #[test]
    fn when_groups_hold_numbers_or_null_then_they_are_read_as_text() {
        let rules = parse_rules("- groups: [2024, admin]\n- groups:\n", Path::new("users.yaml"), false)
            .expect("numeric groups should be accepted");

        assert_eq!(rules.get(0).map(|rule| rule.groups.clone()), Some(btreeset! { "2024".to_owned(), "admin".to_owned() }));
        assert_eq!(rules.get(1).map(|rule| rule.groups.is_empty()), Some(true));
    }

    #[test]
    fn when_override_values_are_not_json_numbers_or_are_tagged_then_they_are_kept() {
        let rules = parse_rules(
            "- claims:\n    inf: .inf\n    big: 110169484474386276334\n    tagged: !custom val\n",
            Path::new("users.yaml"),
            true,
        )
        .expect("override values should pass through");

        let overrides = &rules.get(0).expect("rule should exist").overrides;
        assert_eq!(overrides["inf"], ClaimValue::from(".inf"));
        assert_eq!(overrides["big"], ClaimValue::from("110169484474386276334"));
        assert_eq!(overrides["tagged"], ClaimValue::from("val"));
    }
}
