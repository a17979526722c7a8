pub mod test_guideline;
pub mod user;
pub mod workflow;

pub use test_guideline::{AssignedUser, DashboardStats, TestGuidelineDetail, TestGuidelineSummary};
pub use user::UserRecord;
pub use workflow::{DueTg, ReminderRow};
