use thiserror::Error;

use super::models::Lane;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("No task at index {index} in lane {lane} (lane holds {len})")]
    TaskIndexOutOfRange { lane: Lane, index: usize, len: usize },

    #[error("Task id {0} appears more than once")]
    DuplicateTaskId(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
