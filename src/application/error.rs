use thiserror::Error;

use crate::{application::repos::RepoError, domain::error::DomainError, infra::error::InfraError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, lookup: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(entity, lookup))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(message))
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::NotFound { .. }))
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Domain(DomainError::Validation { .. })
                | AppError::Repo(RepoError::InvalidInput { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_not_found_and_validation() {
        assert!(AppError::not_found("translation", "id: 1").is_not_found());
        assert!(AppError::from(RepoError::invalid_input("bad sort")).is_validation());
        assert!(!AppError::from(RepoError::invalid_input("bad sort")).is_not_found());
        assert!(!AppError::validation("bad").is_not_found());
    }

    #[test]
    fn domain_errors_display_transparently() {
        let err = AppError::not_found("translation", "id: 9");
        assert_eq!(err.to_string(), "translation not found with id: 9");
    }
}
