use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsOverview {
    pub total_habits: i64,
    pub completed_today: i64,
    pub completion_rate_today: f64,
    pub average_streak: f64,
    pub total_completions: i64,
}

/// Per-habit row of `GET /stats/comparison`, sorted by current streak server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitComparison {
    pub id: i64,
    pub name: String,
    pub current_streak: i64,
    pub best_streak: i64,
    pub completion_rate_30d: f64,
}
