pub mod access;
pub mod models;
pub mod reminders;
pub mod workflow;

pub use access::{granted_roles, ProviderKind};
pub use models::{TgSchedule, TgStatus};
pub use workflow::Transition;
