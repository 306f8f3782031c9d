use clap::Args;
use nebula_claims::{FileRuleSetLoader, RuleSetLoader as _};

use crate::config::ApplicationConfig;

use super::RunCommand;

#[derive(Args, Debug)]
pub struct CheckCommand {}

impl RunCommand for CheckCommand {
    fn run(&self, config: &ApplicationConfig) -> anyhow::Result<()> {
        let loader = FileRuleSetLoader::from(&config.rules);
        let rules = loader.load()?;

        match loader.path() {
            Some(path) => println!("{} rule(s) loaded from {}", rules.len(), path.display()),
            None => println!("no rule file configured, every user receives the default claims"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::CheckCommand;
    use crate::{
        command::RunCommand as _,
        config::{ApplicationConfig, LogConfig, RulesConfig},
        logger::LoggerFormat,
    };

    fn config_with_rules(path: Option<std::path::PathBuf>, strict: bool) -> ApplicationConfig {
        ApplicationConfig { rules: RulesConfig { path, strict }, log: LogConfig { format: LoggerFormat::Json } }
    }

    #[test]
    fn when_rules_file_is_missing_then_check_fails() {
        let config = config_with_rules(Some("/nonexistent/nebula/users.yaml".into()), false);

        let error = CheckCommand {}.run(&config).expect_err("checking a missing rules file should fail");

        assert!(error.to_string().contains("/nonexistent/nebula/users.yaml"));
    }

    #[test]
    fn when_no_rules_file_is_configured_then_check_succeeds() {
        CheckCommand {}.run(&config_with_rules(None, true)).expect("checking without rules should be successful");
    }

    #[test]
    fn when_rules_file_has_unknown_field_and_strict_then_check_fails() {
        let mut file = NamedTempFile::new().expect("creating temp file should be successful");
        file.write_all(b"- sub: u1\n  role: admin\n").expect("writing temp file should be successful");

        let lenient = CheckCommand {}.run(&config_with_rules(Some(file.path().to_path_buf()), false));
        let strict = CheckCommand {}.run(&config_with_rules(Some(file.path().to_path_buf()), true));

        assert!(lenient.is_ok());
        assert!(strict.is_err());
    }
}
