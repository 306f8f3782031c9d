use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use nebula_claims::FileRuleSetLoader;
use serde::Deserialize;

use crate::{command::GlobalArgs, logger::LoggerFormat};

const CONFIG_PREFIX: &str = "nebula";
const CONFIG_FILE_NAME: &str = "claims_config.toml";

#[derive(Deserialize, Debug)]
pub struct ApplicationConfig {
    pub rules: RulesConfig,
    pub log: LogConfig,
}

#[derive(Deserialize, Debug)]
pub struct RulesConfig {
    pub path: Option<PathBuf>,
    pub strict: bool,
}

#[derive(Deserialize, Debug)]
pub struct LogConfig {
    pub format: LoggerFormat,
}

impl From<&RulesConfig> for FileRuleSetLoader {
    fn from(config: &RulesConfig) -> Self {
        FileRuleSetLoader::builder().maybe_path(config.path.clone()).strict(config.strict).build()
    }
}

pub fn load_config(args: &GlobalArgs) -> anyhow::Result<ApplicationConfig> {
    let config_file_path = match args.config {
        Some(ref path_override) => path_override.clone(),
        None => default_config_file_path()?,
    };

    let config: ApplicationConfig = Config::builder()
        .set_default("rules.strict", false)?
        .set_default("log.format", "JSON")?
        .add_source(File::from(config_file_path).format(FileFormat::Toml))
        .set_override_option("rules.path", args.rules.as_ref().map(|path| path.to_string_lossy().into_owned()))?
        .set_override_option("rules.strict", args.strict.then_some(true))?
        .build()?
        .try_deserialize()?;

    Ok(config)
}

fn default_config_file_path() -> anyhow::Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX)?;

    let user_config_dir = xdg_dirs.get_config_home();
    if !user_config_dir.exists() {
        std::fs::create_dir_all(&user_config_dir)?;
    }

    let config_file_path = user_config_dir.join(CONFIG_FILE_NAME);
    if !config_file_path.exists() {
        write_default_config_file(&config_file_path)?;
    }

    Ok(config_file_path)
}

fn write_default_config_file(path: &Path) -> anyhow::Result<()> {
    let default_config_content = include_str!("../static/default_config.toml");
    std::fs::write(path, default_config_content)?;
    Ok(())
}
