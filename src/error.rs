//! Error types for resource service operations.

use std::fmt;

use crate::store::StoreError;

/// Error type for service-level operations, mapped 1:1 to transport status
/// codes at the HTTP boundary.
#[derive(Debug)]
pub enum ServiceError {
    /// Requested identity absent from a mutate/read-single operation.
    NotFound(String),
    /// Required field missing or malformed on create/update input; the
    /// request is rejected before any store access.
    Validation(String),
    /// Store failure (unreadable, unwritable, or malformed content). The
    /// mutation must be treated as not applied.
    Store(StoreError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound(what) => write!(f, "not found: {}", what),
            ServiceError::Validation(msg) => write!(f, "validation failed: {}", msg),
            ServiceError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Store(err)
    }
}

impl ServiceError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::Validation(_) => 422,
            ServiceError::Store(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ServiceError::Validation("x".into()).status_code(), 422);
        assert_eq!(
            ServiceError::Store(StoreError::Io("disk".into())).status_code(),
            500
        );
    }
}
