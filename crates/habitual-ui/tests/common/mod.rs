//! In-memory `HabitService` for driving the app without a network.
//!
//! Every call is logged by name. `list_habits` snapshots the habits at call
//! time and then waits out the next queued delay, which lets tests decide
//! the order in which overlapping reloads resolve.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use habitual_core::category::{Category, CreateCategory};
use habitual_core::habit::{CreateHabit, Difficulty, Habit, Streak, UpdateHabit};
use habitual_core::record::{CreateRecord, HeatmapEntry, Record};
use habitual_core::stats::{HabitComparison, StatsOverview};
use habitual_core::{AppConfig, ApiMessage};
use habitual_service::{HabitService, ServiceError};
use habitual_ui::app::App;

#[derive(Default)]
pub struct FakeState {
    pub online: bool,
    pub habits: Vec<Habit>,
    pub categories: Vec<Category>,
    pub stats: StatsOverview,
    pub records: Vec<CreateRecord>,
    pub next_id: i64,
    pub calls: Vec<&'static str>,
    pub list_delays: VecDeque<Duration>,
    pub fail_create: bool,
    pub fail_list: bool,
}

#[derive(Clone, Default)]
pub struct FakeService {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeService {
    pub fn online() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().online = true;
        fake.state.lock().unwrap().next_id = 100;
        fake
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_habits(self, habits: Vec<Habit>) -> Self {
        self.state.lock().unwrap().habits = habits;
        self
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.state.lock().unwrap().categories = categories;
        self
    }

    pub fn with_stats(self, stats: StatsOverview) -> Self {
        self.state.lock().unwrap().stats = stats;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn set_online(&self, online: bool) {
        self.state.lock().unwrap().online = online;
    }

    pub fn queue_list_delays(&self, delays: &[Duration]) {
        self.state.lock().unwrap().list_delays.extend(delays);
    }

    fn log(&self, call: &'static str) {
        self.state.lock().unwrap().calls.push(call);
    }

    pub fn app(&self) -> App {
        App::new(Arc::new(self.clone()), AppConfig::default())
    }
}

pub fn habit(id: i64, name: &str, completed_today: bool) -> Habit {
    Habit {
        id,
        name: name.into(),
        description: None,
        category_id: None,
        category_name: None,
        category_color: None,
        difficulty: Difficulty::Medium,
        goal_frequency: 7,
        reminder_time: None,
        color: None,
        icon: "✓".into(),
        created_at: None,
        completed_today,
        streak: Streak::default(),
        completion_rate: 0.0,
        best_weekday: None,
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.into(),
        icon: "📌".into(),
        color: None,
    }
}

fn not_found() -> ServiceError {
    ServiceError::Http {
        status: 404,
        message: "Hábito não encontrado".into(),
    }
}

#[async_trait]
impl HabitService for FakeService {
    async fn list_habits(&self) -> Result<Vec<Habit>, ServiceError> {
        let (snapshot, delay, fail) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push("list_habits");
            let delay = state.list_delays.pop_front();
            (state.habits.clone(), delay, state.fail_list)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(ServiceError::Network("connection refused".into()));
        }
        Ok(snapshot)
    }

    async fn get_habit(&self, id: i64) -> Result<Habit, ServiceError> {
        self.log("get_habit");
        let state = self.state.lock().unwrap();
        state
            .habits
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_habit(&self, input: &CreateHabit) -> Result<ApiMessage, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("create_habit");
        if state.fail_create {
            return Err(ServiceError::Http {
                status: 500,
                message: "boom".into(),
            });
        }
        state.next_id += 1;
        let id = state.next_id;
        let mut created = habit(id, &input.name, false);
        created.description = input.description.clone();
        created.category_id = input.category_id;
        created.difficulty = input.difficulty;
        created.goal_frequency = input.goal_frequency;
        state.habits.push(created);
        Ok(ApiMessage {
            id: Some(id),
            message: "Hábito criado com sucesso".into(),
        })
    }

    async fn update_habit(
        &self,
        id: i64,
        update: &UpdateHabit,
    ) -> Result<ApiMessage, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("update_habit");
        let habit = state
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(not_found)?;
        habit.name = update.name.clone();
        Ok(ApiMessage::default())
    }

    async fn delete_habit(&self, id: i64) -> Result<ApiMessage, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("delete_habit");
        let before = state.habits.len();
        state.habits.retain(|h| h.id != id);
        if state.habits.len() == before {
            return Err(not_found());
        }
        Ok(ApiMessage::default())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_categories");
        Ok(state.categories.clone())
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<ApiMessage, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("create_category");
        state.next_id += 1;
        let id = state.next_id;
        state.categories.push(category(id, &input.name));
        Ok(ApiMessage {
            id: Some(id),
            message: String::new(),
        })
    }

    async fn create_record(&self, input: &CreateRecord) -> Result<ApiMessage, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("create_record");
        if let Some(habit) = state.habits.iter_mut().find(|h| h.id == input.habit_id) {
            habit.completed_today = input.completed;
        }
        state.records.push(input.clone());
        Ok(ApiMessage::default())
    }

    async fn list_records(&self, _habit_id: i64, _days: u32) -> Result<Vec<Record>, ServiceError> {
        self.log("list_records");
        Ok(Vec::new())
    }

    async fn heatmap(&self, _habit_id: i64) -> Result<Vec<HeatmapEntry>, ServiceError> {
        self.log("heatmap");
        Ok(Vec::new())
    }

    async fn stats_overview(&self) -> Result<StatsOverview, ServiceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("stats_overview");
        Ok(state.stats.clone())
    }

    async fn stats_comparison(&self) -> Result<Vec<HabitComparison>, ServiceError> {
        self.log("stats_comparison");
        Ok(Vec::new())
    }

    async fn check_health(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        state.calls.push("check_health");
        state.online
    }
}
