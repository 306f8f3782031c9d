use serde::Deserialize;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Default)]
pub(super) struct LoggerConfig {
    pub format: LoggerFormat,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoggerFormat {
    #[default]
    Json,
    Pretty,
}

// Claims go to stdout, so logs are kept on stderr.
pub(super) fn init_logger(config: LoggerConfig) {
    let builder = SubscriberBuilder::default().with_writer(std::io::stderr);

    match config.format {
        LoggerFormat::Json => builder.json().init(),
        LoggerFormat::Pretty => builder.pretty().init(),
    }
}
