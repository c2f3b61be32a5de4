use std::{error, fmt, io, path::PathBuf};

use crate::core::battle::scenario;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Debug, derive_more::From)]
pub enum Error {
    RonDeserializeError {
        error: ron::de::Error,
        path: PathBuf,
    },
    IOError(io::Error),
    ScenarioError(scenario::Error),
}

impl Error {
    pub fn from_ron_de_error(error: ron::de::Error, path: PathBuf) -> Self {
        Error::RonDeserializeError { error, path }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::RonDeserializeError { error, path } => {
                let s = path.to_str().unwrap_or("<no path>");
                write!(f, "Can't deserialize '{}': {}", s, error)
            }
            Error::IOError(e) => write!(f, "IO Error: {}", e),
            Error::ScenarioError(e) => write!(f, "Bad scenario: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::RonDeserializeError { error, .. } => Some(error),
            Error::IOError(e) => Some(e),
            Error::ScenarioError(e) => Some(e),
        }
    }
}
