use soapbox_core::Fault;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    /// Fault reported by the server; displays as its message
    #[error("{0}")]
    Fault(Fault),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} timeout exceeded")]
    Timeout(&'static str),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error came from the network rather than from the
    /// payload or the server
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Io(_) | Self::Timeout(_) | Self::Transport(_)
        )
    }

    /// The server fault, if this error is one
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<soapbox_core::Error> for Error {
    fn from(err: soapbox_core::Error) -> Self {
        match err {
            soapbox_core::Error::Encode(msg) => Self::Encode(msg),
            soapbox_core::Error::Decode(msg) => Self::Decode(msg),
        }
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
