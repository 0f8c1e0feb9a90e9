//! Error taxonomy for registry operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegError {
    /// A referenced row does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// No user account with the given name.
    #[error("no user named {0}")]
    UnknownUser(String),

    /// The (session, person) pair is already registered. Re-registering is
    /// rejected rather than silently producing a duplicate row.
    #[error("person {person_id} is already registered for session {session_id}")]
    AlreadyRegistered { session_id: i32, person_id: i32 },

    /// A malformed attendance entry. Collected per row during
    /// attendance-taking, never fatal for the batch.
    #[error("invalid attendance entry: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl RegError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type RegResult<T> = Result<T, RegError>;
