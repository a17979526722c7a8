pub mod status;
pub mod test_guideline;
pub mod user;

pub use status::{AssignmentRole, AssignmentStatus, TgStatus, UnknownCode};
pub use test_guideline::{PhaseWindow, TgSchedule};
pub use user::{ExternalIdentity, UserProfile};
