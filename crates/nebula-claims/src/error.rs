use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("can't read user claims file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse user claims file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown field '{field}' in rule #{index} of user claims file {}", path.display())]
    UnknownRuleField { path: PathBuf, index: usize, field: String },
}

pub type Result<T> = std::result::Result<T, ClaimsError>;
