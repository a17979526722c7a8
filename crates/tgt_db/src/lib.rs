pub mod error;
pub mod models;
pub mod pool;
pub mod repository;
pub mod schema;

// Re-export common types for convenience
pub use error::{Error, Result};
pub use pool::DbConfig;
pub use repository::{TestGuidelineRepository, UserRepository, WorkflowRepository};
pub use sqlx::MySqlPool;
