use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tac json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InputError(String),
    #[error("invalid instruction {index} in {proc}: {reason}")]
    InvalidInstr {
        proc: String,
        index: usize,
        reason: String,
    },
    #[error("{0}")]
    ProgramError(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;
