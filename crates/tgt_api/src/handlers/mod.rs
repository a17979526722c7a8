pub mod auth;
pub mod dashboard;
pub mod health;
pub mod test_guidelines;

pub use auth::{exchange_token, me, userinfo};
pub use dashboard::stats;
pub use health::health_check;
pub use test_guidelines::{get_test_guideline, list_test_guidelines};
