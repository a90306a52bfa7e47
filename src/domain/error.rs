use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found with {lookup}")]
    NotFound {
        entity: &'static str,
        lookup: String,
    },
    #[error("domain validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str, lookup: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            lookup: lookup.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_lookup() {
        let err = DomainError::not_found("translation", "id: 42");
        assert_eq!(err.to_string(), "translation not found with id: 42");
    }
}
