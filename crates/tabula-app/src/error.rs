use std::{io, path::PathBuf};

use tabula::{ColorParseError, InvalidArgument, MalformedFont};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    #[error(transparent)]
    Color(#[from] ColorParseError),
    #[error(transparent)]
    Font(#[from] MalformedFont),
    #[error("failed to read config file '{}'", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed canvas config: {0}")]
    ParseConfig(#[from] toml::de::Error),
    #[error("failed to serialize canvas config: {0}")]
    SerializeConfig(#[from] toml::ser::Error),
}
