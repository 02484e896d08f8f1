pub mod recovery;
pub mod workout;

pub use recovery::RecoveryDraft;
pub use workout::{SetField, WorkoutDraft};
