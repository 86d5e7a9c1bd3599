//! Fund domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the fund operations domain
#[derive(Debug, Error)]
pub enum FundError {
    #[error("Fund not found: {0}")]
    FundNotFound(String),

    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: &'static str, id: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid status transition for {entity} {id}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        id: String,
        from: String,
        to: String,
    },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Seed data error: {0}")]
    Seed(String),
}

impl FundError {
    pub fn record_not_found(entity: &'static str, id: impl ToString) -> Self {
        FundError::RecordNotFound { entity, id: id.to_string() }
    }

    pub fn invalid_command(message: impl Into<String>) -> Self {
        FundError::InvalidCommand(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        FundError::InvariantViolation(message.into())
    }
}

impl From<FundError> for PortError {
    fn from(err: FundError) -> Self {
        match err {
            FundError::FundNotFound(id) => PortError::not_found("Fund", id),
            FundError::RecordNotFound { entity, id } => PortError::not_found(entity, id),
            FundError::InvalidCommand(message) => PortError::validation(message),
            err @ FundError::InvalidTransition { .. } => PortError::conflict(err.to_string()),
            err @ (FundError::InvariantViolation(_) | FundError::Seed(_)) => {
                PortError::internal(err.to_string())
            }
        }
    }
}
