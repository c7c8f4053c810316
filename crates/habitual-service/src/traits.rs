use std::time::Duration;

use async_trait::async_trait;
use habitual_core::category::{Category, CreateCategory};
use habitual_core::habit::{CreateHabit, Habit, UpdateHabit};
use habitual_core::record::{CreateRecord, HeatmapEntry, Record};
use habitual_core::stats::{HabitComparison, StatsOverview};
use habitual_core::ApiMessage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ServiceError {
    /// HTTP status code, when the failure came from a completed response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Abstraction over the habit tracker backend.
///
/// The orchestrator and the TUI program against this trait.
/// `HttpService` talks to the REST API; tests substitute in-memory fakes.
/// No implementation retries: every call is a single attempt.
#[async_trait]
pub trait HabitService: Send + Sync {
    // -- Habits --
    async fn list_habits(&self) -> Result<Vec<Habit>, ServiceError>;
    async fn get_habit(&self, id: i64) -> Result<Habit, ServiceError>;
    async fn create_habit(&self, input: &CreateHabit) -> Result<ApiMessage, ServiceError>;
    async fn update_habit(&self, id: i64, update: &UpdateHabit)
        -> Result<ApiMessage, ServiceError>;
    async fn delete_habit(&self, id: i64) -> Result<ApiMessage, ServiceError>;

    // -- Categories --
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;
    async fn create_category(&self, input: &CreateCategory) -> Result<ApiMessage, ServiceError>;

    // -- Records --
    async fn create_record(&self, input: &CreateRecord) -> Result<ApiMessage, ServiceError>;
    async fn list_records(&self, habit_id: i64, days: u32) -> Result<Vec<Record>, ServiceError>;
    async fn heatmap(&self, habit_id: i64) -> Result<Vec<HeatmapEntry>, ServiceError>;

    // -- Stats --
    async fn stats_overview(&self) -> Result<StatsOverview, ServiceError>;
    async fn stats_comparison(&self) -> Result<Vec<HabitComparison>, ServiceError>;

    /// Best-effort reachability probe. Any failure reads as offline.
    async fn check_health(&self) -> bool;
}
