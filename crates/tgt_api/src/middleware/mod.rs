pub mod auth;
pub mod cors;
pub mod failures;

pub use auth::{bearer_token, require_auth, AuthContext};
pub use cors::cors;
pub use failures::catch_failures;
