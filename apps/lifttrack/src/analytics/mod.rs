pub mod progression;

pub use progression::{chart_series, session_highlights, unique_exercises, Metric};
