use thiserror::Error;

use super::model::ContactId;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Contact not found: {id}")]
    ContactNotFound { id: ContactId },

    #[error("Missing required parameter '{name}'")]
    MissingParameter { name: &'static str },

    #[error("{message}")]
    Internal { message: String },
}

impl DomainError {
    #[must_use]
    pub fn contact_not_found(id: ContactId) -> Self {
        Self::ContactNotFound { id }
    }

    #[must_use]
    pub fn missing_parameter(name: &'static str) -> Self {
        Self::MissingParameter { name }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(e: anyhow::Error) -> Self {
        Self::internal(format!("{e:#}"))
    }
}
