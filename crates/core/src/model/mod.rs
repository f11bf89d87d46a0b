mod feedback;
mod history;
mod ids;
mod question;
mod role;

pub use feedback::Feedback;
pub use history::{HistoryEntry, QuestionHistory};
pub use ids::{ParseSessionIdError, SessionId};
pub use question::Question;
pub use role::Role;
