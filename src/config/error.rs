//! Errors raised while reading or checking `texmill.toml`.

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("cannot read config file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML or has unknown/mistyped keys.
    #[error("invalid config file `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed fine but cannot be used for a build.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
