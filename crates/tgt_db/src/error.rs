use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Schema asset missing: {0}")]
    MissingSchemaAsset(String),
}

pub type Result<T> = std::result::Result<T, Error>;
