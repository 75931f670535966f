use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl Error {
    pub fn encode(msg: impl ToString) -> Self {
        Self::Encode(msg.to_string())
    }

    pub fn decode(msg: impl ToString) -> Self {
        Self::Decode(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
