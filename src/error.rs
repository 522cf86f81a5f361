//! Crate-wide error aggregation.
//!
//! Each subsystem defines its own error enum (see `spelling::CorrectorError`,
//! `synonyms::SynonymError`); this type exists for callers that want a single
//! `Result` alias spanning the whole library, mirroring the way the teacher
//! crate aggregates `PreprocessError` at the module boundary.

use thiserror::Error;

use crate::mining::MiningError;
use crate::spelling::CorrectorError;
use crate::synonyms::SynonymError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Corrector(#[from] CorrectorError),

    #[error(transparent)]
    Synonym(#[from] SynonymError),

    #[error(transparent)]
    Mining(#[from] MiningError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
