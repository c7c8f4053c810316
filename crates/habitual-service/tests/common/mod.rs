//! In-process stand-in for the habit tracker REST backend.
//!
//! Serves the same routes as the real API from memory on 127.0.0.1:0 and
//! records what the client sent so tests can inspect headers and bodies.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use habitual_core::habit::{Difficulty, Habit, Streak};
use habitual_core::record::Record;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TODAY: &str = "2026-10-16";

#[derive(Default)]
pub struct StubState {
    pub habits: Vec<Habit>,
    /// Stored as raw rows: the backend keeps explicit `null` icons.
    pub categories: Vec<Value>,
    pub records: Vec<Record>,
    pub next_id: i64,
    /// Artificial latency for `GET /stats/overview`.
    pub stats_delay: Option<Duration>,
    /// Content-Type header of every request received, in order.
    pub content_types: Vec<Option<String>>,
    pub last_habit_body: Option<Value>,
    pub last_record_query: Option<String>,
}

impl StubState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Shared = Arc<Mutex<StubState>>;

pub struct TestBackend {
    pub api_url: String,
    pub health_url: String,
    pub state: Shared,
    _handle: tokio::task::JoinHandle<()>,
}

pub async fn spawn_backend() -> TestBackend {
    let state: Shared = Arc::new(Mutex::new(StubState::default()));
    let api = Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/habits", get(list_habits).post(create_habit))
        .route(
            "/habits/{id}",
            get(get_habit).put(update_habit).delete(delete_habit),
        )
        .route("/records", axum::routing::post(create_record))
        .route("/records/{habit_id}", get(list_records))
        .route("/records/heatmap/{habit_id}", get(heatmap))
        .route("/stats/overview", get(overview))
        .route("/stats/comparison", get(comparison));

    let app = Router::new()
        .route("/", get(home))
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), capture))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestBackend {
        api_url: format!("http://{addr}/api"),
        health_url: format!("http://{addr}/"),
        state,
        _handle: handle,
    }
}

pub fn habit(id: i64, name: &str) -> Habit {
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
        completed_today: false,
        streak: Streak::default(),
        completion_rate: 0.0,
        best_weekday: None,
    }
}

async fn capture(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.lock().unwrap().content_types.push(content_type);
    next.run(req).await
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Hábito não encontrado" })),
    )
        .into_response()
}

async fn home() -> Json<Value> {
    Json(json!({ "message": "Habit Tracker API", "version": "1.0" }))
}

async fn list_categories(State(state): State<Shared>) -> Json<Vec<Value>> {
    Json(state.lock().unwrap().categories.clone())
}

async fn create_category(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = state.lock().unwrap();
    let name = body["name"].as_str().unwrap_or_default().to_string();
    if st.categories.iter().any(|c| c["name"] == name.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Categoria já existe" })),
        )
            .into_response();
    }
    let id = st.next_id();
    // A missing key gets the default; an explicit null is stored as null.
    let icon = body.get("icon").cloned().unwrap_or_else(|| json!("📌"));
    let color = body.get("color").cloned().unwrap_or(Value::Null);
    st.categories.push(json!({ "id": id, "name": name, "icon": icon, "color": color }));
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Categoria criada com sucesso" })),
    )
        .into_response()
}

async fn list_habits(State(state): State<Shared>) -> Json<Vec<Habit>> {
    Json(state.lock().unwrap().habits.clone())
}

async fn get_habit(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let st = state.lock().unwrap();
    match st.habits.iter().find(|h| h.id == id) {
        Some(h) => Json(h.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_habit(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = state.lock().unwrap();
    let id = st.next_id();
    let mut h = habit(id, body["name"].as_str().unwrap_or_default());
    h.description = body["description"].as_str().map(String::from);
    h.category_id = body["category_id"].as_i64();
    h.difficulty = body["difficulty"]
        .as_str()
        .and_then(Difficulty::from_str)
        .unwrap_or_default();
    h.goal_frequency = body["goal_frequency"].as_i64().unwrap_or(7);
    h.icon = body["icon"].as_str().unwrap_or("✓").to_string();
    st.habits.push(h);
    st.last_habit_body = Some(body);
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Hábito criado com sucesso" })),
    )
        .into_response()
}

async fn update_habit(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    let Some(h) = st.habits.iter_mut().find(|h| h.id == id) else {
        return not_found();
    };
    if let Some(name) = body["name"].as_str() {
        h.name = name.to_string();
    }
    h.description = body["description"].as_str().map(String::from);
    Json(json!({ "message": "Hábito atualizado com sucesso" })).into_response()
}

async fn delete_habit(State(state): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    state.lock().unwrap().habits.retain(|h| h.id != id);
    Json(json!({ "message": "Hábito removido com sucesso" }))
}

async fn create_record(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = state.lock().unwrap();
    let habit_id = body["habit_id"].as_i64().unwrap_or_default();
    let completed = body["completed"].as_bool().unwrap_or(true);
    let date = body["date"].as_str().unwrap_or(TODAY).to_string();
    if let Some(h) = st.habits.iter_mut().find(|h| h.id == habit_id) {
        if date == TODAY {
            h.completed_today = completed;
        }
    }
    if let Some(existing) = st
        .records
        .iter_mut()
        .find(|r| r.habit_id == habit_id && r.date.as_deref() == Some(date.as_str()))
    {
        existing.completed = completed;
        return Json(json!({ "message": "Registro atualizado com sucesso" })).into_response();
    }
    let id = st.next_id();
    st.records.push(Record {
        id: Some(id),
        habit_id,
        date: Some(date),
        completed,
        notes: body["notes"].as_str().map(String::from),
        created_at: None,
    });
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Registro criado com sucesso" })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct DaysQuery {
    days: Option<u32>,
}

async fn list_records(
    State(state): State<Shared>,
    Path(habit_id): Path<i64>,
    Query(q): Query<DaysQuery>,
) -> Json<Value> {
    let mut st = state.lock().unwrap();
    st.last_record_query = q.days.map(|d| format!("days={d}"));
    let rows: Vec<Value> = st
        .records
        .iter()
        .filter(|r| r.habit_id == habit_id)
        .map(|r| {
            json!({
                "id": r.id,
                "habit_id": r.habit_id,
                "date": r.date,
                "completed": if r.completed { 1 } else { 0 },
                "notes": r.notes,
            })
        })
        .collect();
    Json(Value::Array(rows))
}

async fn heatmap(State(state): State<Shared>, Path(habit_id): Path<i64>) -> Json<Value> {
    let st = state.lock().unwrap();
    let rows: Vec<Value> = st
        .records
        .iter()
        .filter(|r| r.habit_id == habit_id)
        .map(|r| json!({ "date": r.date, "completed": if r.completed { 1 } else { 0 } }))
        .collect();
    Json(Value::Array(rows))
}

async fn overview(State(state): State<Shared>) -> Json<Value> {
    let delay = state.lock().unwrap().stats_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let st = state.lock().unwrap();
    let total = st.habits.len() as i64;
    let done = st.habits.iter().filter(|h| h.completed_today).count() as i64;
    let rate = if total > 0 {
        (done as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };
    Json(json!({
        "total_habits": total,
        "completed_today": done,
        "completion_rate_today": rate,
        "average_streak": 0,
        "total_completions": st.records.iter().filter(|r| r.completed).count(),
    }))
}

async fn comparison(State(state): State<Shared>) -> Json<Value> {
    let st = state.lock().unwrap();
    let rows: Vec<Value> = st
        .habits
        .iter()
        .map(|h| {
            json!({
                "id": h.id,
                "name": h.name,
                "current_streak": h.streak.current,
                "best_streak": h.streak.best,
                "completion_rate_30d": h.completion_rate,
            })
        })
        .collect();
    Json(Value::Array(rows))
}
