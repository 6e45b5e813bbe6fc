//! Error mapping from domain errors to GraphQL errors.

use std::sync::Arc;

use {async_graphql::ErrorExtensions, tracing::error};

/// Failures a resolver can surface to the client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Malformed input, tagged with the offending argument.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    Unauthenticated(String),

    /// Store failures are reported opaquely. The cause is logged.
    #[error("internal database error")]
    Database(Arc<hackernews_store::Error>),

    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Database(_) | Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        match self {
            Self::Database(source) => error!(error = %source, "store operation failed"),
            Self::Internal(message) => error!(%message, "resolver failed"),
            Self::Validation { .. } | Self::Unauthenticated(_) => {},
        }
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.code());
            if let Self::Validation { field, .. } = self {
                ext.set("field", field.clone());
            }
        })
    }
}

impl From<hackernews_store::Error> for ApiError {
    fn from(err: hackernews_store::Error) -> Self {
        Self::Database(Arc::new(err))
    }
}

impl From<Arc<hackernews_store::Error>> for ApiError {
    fn from(err: Arc<hackernews_store::Error>) -> Self {
        Self::Database(err)
    }
}

impl From<hackernews_auth::Error> for ApiError {
    fn from(err: hackernews_auth::Error) -> Self {
        match err {
            hackernews_auth::Error::InvalidCredentials => Self::unauthenticated(err.to_string()),
            hackernews_auth::Error::EmailTaken => Self::validation("authProvider.email", err.to_string()),
            hackernews_auth::Error::Store(source) => source.into(),
            hackernews_auth::Error::Hash { .. } => Self::Internal(err.to_string()),
        }
    }
}

/// Convert any domain error into an extended `async_graphql::Error`.
pub fn api_err(err: impl Into<ApiError>) -> async_graphql::Error {
    err.into().extend()
}
