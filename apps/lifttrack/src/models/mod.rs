pub mod insight;
pub mod recovery;
pub mod workout;

pub use insight::AiInsight;
pub use recovery::RecoveryLog;
pub use workout::{ExerciseLog, SetLog, WorkoutLog};
