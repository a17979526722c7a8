pub mod test_guideline;
pub mod user;
pub mod workflow;

pub use test_guideline::{ListFilter, TestGuidelineRepository};
pub use user::UserRepository;
pub use workflow::WorkflowRepository;
