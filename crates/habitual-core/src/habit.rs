use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HabitualError;

pub const DEFAULT_ICON: &str = "✓";
pub const DEFAULT_GOAL_FREQUENCY: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: &[Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Next entry in `ALL`, wrapping around. Used by select widgets.
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: i64,
    pub best: i64,
}

/// A habit as returned by `GET /habits`. `completed_today`, `streak`,
/// `completion_rate` and `best_weekday` are computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_color: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_goal_frequency")]
    pub goal_frequency: i64,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "crate::flag::deserialize")]
    pub completed_today: bool,
    #[serde(default)]
    pub streak: Streak,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub best_weekday: Option<String>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_goal_frequency() -> i64 {
    DEFAULT_GOAL_FREQUENCY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHabit {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub difficulty: Difficulty,
    pub goal_frequency: i64,
    pub icon: String,
}

impl CreateHabit {
    /// Mirrors the form's `required` attributes; anything else is left to the backend.
    pub fn validate(&self) -> Result<(), HabitualError> {
        if self.name.trim().is_empty() {
            return Err(HabitualError::InvalidInput("habit name is required".into()));
        }
        if self.icon.is_empty() {
            return Err(HabitualError::InvalidInput("icon must not be empty".into()));
        }
        Ok(())
    }
}

/// Full replacement body for `PUT /habits/{id}`; the backend overwrites every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateHabit {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub difficulty: Difficulty,
    pub goal_frequency: i64,
    pub reminder_time: Option<String>,
    pub color: Option<String>,
    pub icon: String,
}

impl From<&Habit> for UpdateHabit {
    fn from(habit: &Habit) -> Self {
        Self {
            name: habit.name.clone(),
            description: habit.description.clone(),
            category_id: habit.category_id,
            difficulty: habit.difficulty,
            goal_frequency: habit.goal_frequency,
            reminder_time: habit.reminder_time.clone(),
            color: habit.color.clone(),
            icon: habit.icon.clone(),
        }
    }
}
