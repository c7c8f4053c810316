pub mod category;
pub mod config;
pub mod error;
pub mod filter;
mod flag;
pub mod habit;
pub mod record;
pub mod stats;

pub use category::Category;
pub use config::AppConfig;
pub use error::HabitualError;
pub use filter::Filter;
pub use habit::{Difficulty, Habit, Streak};
pub use record::Record;
pub use stats::StatsOverview;

use serde::{Deserialize, Serialize};

/// Acknowledgement body returned by the backend's create/update/delete routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: String,
}
