use serde::{Deserialize, Serialize};

/// One completion (or explicit non-completion) of a habit on a given day.
/// The backend keys records by `(habit_id, date)` and upserts on conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: Option<i64>,
    pub habit_id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "crate::flag::deserialize")]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for `POST /records`. Leaving `date` unset lets the server stamp today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecord {
    pub habit_id: i64,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl CreateRecord {
    pub fn today(habit_id: i64, completed: bool) -> Self {
        Self {
            habit_id,
            completed,
            date: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapEntry {
    pub date: String,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    pub completed: bool,
}
