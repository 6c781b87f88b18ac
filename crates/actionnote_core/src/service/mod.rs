//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input and orchestrate repository calls.
//! - Keep CLI/transport layers decoupled from storage details.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod action_item_service;
pub mod extraction_service;
pub mod note_service;
pub mod tag_service;

/// Service error shared by use-case APIs.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller input failed validation.
    InvalidInput(String),
    NotFound { entity: &'static str, id: i64 },
    Conflict(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// A write could not be read back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Conflict(message) => Self::Conflict(message),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}
