use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email is already registered")]
    EmailTaken,

    #[error("failed to hash password: {message}")]
    Hash { message: String },

    #[error(transparent)]
    Store(#[from] hackernews_store::Error),
}

impl Error {
    #[must_use]
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
