use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("document in `{collection}` is not a JSON object")]
    NotAnObject { collection: String },
}

impl Error {
    #[must_use]
    pub fn not_an_object(collection: impl Into<String>) -> Self {
        Self::NotAnObject {
            collection: collection.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
