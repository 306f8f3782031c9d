use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use nebula_claims::{ClaimSet, FileRuleSetLoader, UserClaimsProvider, UserRecord};
use serde::Serialize;

use crate::config::ApplicationConfig;

use super::RunCommand;

#[derive(Args, Debug)]
pub struct EvaluateCommand {
    /// Reads the user record from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["sub", "origin", "email", "domain", "groups"])]
    user: Option<PathBuf>,
    #[arg(long)]
    sub: Option<String>,
    #[arg(long)]
    origin: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    domain: Option<String>,
    /// Adds a group to the user; repeatable
    #[arg(short, long = "group", value_name = "GROUP")]
    groups: Vec<String>,
}

#[derive(Serialize, Debug)]
struct EvaluationOutput<'a> {
    matched_rule: Option<usize>,
    claims: &'a ClaimSet,
}

impl EvaluateCommand {
    fn user_record(&self) -> anyhow::Result<UserRecord> {
        if let Some(ref path) = self.user {
            let contents =
                std::fs::read_to_string(path).with_context(|| format!("can't read user file {}", path.display()))?;
            return serde_json::from_str(&contents).with_context(|| format!("can't parse user file {}", path.display()));
        }

        Ok(UserRecord::builder()
            .sub(self.sub.clone().unwrap_or_default())
            .origin(self.origin.clone().unwrap_or_default())
            .email(self.email.clone().unwrap_or_default())
            .domain(self.domain.clone().unwrap_or_default())
            .groups(self.groups.iter().cloned().collect())
            .build())
    }
}

impl RunCommand for EvaluateCommand {
    fn run(&self, config: &ApplicationConfig) -> anyhow::Result<()> {
        let user = self.user_record()?;
        let provider = UserClaimsProvider::new(FileRuleSetLoader::from(&config.rules))?;

        let evaluation = provider.evaluate(&user);
        let output = EvaluationOutput { matched_rule: evaluation.matched_rule, claims: &evaluation.claims };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
