use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use evaluate::EvaluateCommand;

use crate::config::ApplicationConfig;

pub mod check;
pub mod evaluate;

pub trait RunCommand {
    fn run(&self, config: &ApplicationConfig) -> anyhow::Result<()>;
}

#[derive(Parser, Debug)]
#[command(term_width = 0, version, about, name = "nebula-claims")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: ClaimsCommand,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true, env = "NEBULA_CLAIMS_CONFIG")]
    pub config: Option<PathBuf>,
    /// Sets the user claims rule file, overriding the config file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub rules: Option<PathBuf>,
    /// Rejects rule files containing unknown fields
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum ClaimsCommand {
    /// Loads the rule file and reports how many rules it holds
    Check(CheckCommand),
    /// Prints the claims a user would receive
    Evaluate(EvaluateCommand),
}

impl Cli {
    pub fn run(&self, config: &ApplicationConfig) -> anyhow::Result<()> {
        match self.command {
            ClaimsCommand::Check(ref cmd) => cmd.run(config),
            ClaimsCommand::Evaluate(ref cmd) => cmd.run(config),
        }
    }
}
