use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodeError {
    #[error("unknown code set: {0}")]
    UnknownCodeSet(String),

    #[error("{code_set} code '{code}' is not well-formed")]
    InvalidFormat { code_set: String, code: String },
}
