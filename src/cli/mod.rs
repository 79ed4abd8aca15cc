pub mod commands;
pub mod output;

pub use commands::run;

use thiserror::Error;

use crate::{errors::StorageError, split::SplitError, tournament::TournamentError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}
