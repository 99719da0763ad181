//! Domain models for Focus.

mod auth;
mod plan;
mod progress;
mod question;

pub use auth::AuthSession;
pub use plan::{Difficulty, Plan, Problem, StudyDay};
pub use progress::{ProblemKey, SolvedSlugSet, SyncResult, SyncTrigger};
pub use question::QuestionContent;
