use std::time::Duration;

use async_trait::async_trait;
use habitual_core::category::{Category, CreateCategory};
use habitual_core::habit::{CreateHabit, Habit, UpdateHabit};
use habitual_core::record::{CreateRecord, HeatmapEntry, Record};
use habitual_core::stats::{HabitComparison, StatsOverview};
use habitual_core::{ApiMessage, AppConfig};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use tracing::{debug, warn};

use crate::{HabitService, ServiceError};

/// Async HTTP client implementation of HabitService.
/// Every exchange is bounded by `timeout`; past it the request future is
/// dropped, which aborts the connection.
pub struct HttpService {
    base_url: String,
    health_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str, health_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            health_url: health_url.to_string(),
            timeout,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_url, &config.health_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        // Declared on every request, bodies or not.
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send the request and read the body, all under the timeout guard.
    async fn execute(&self, builder: RequestBuilder) -> Result<String, ServiceError> {
        let exchange = async {
            let resp = builder
                .send()
                .await
                .map_err(|e| ServiceError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| ServiceError::Network(format!("read body: {e}")))?;
            if status.is_success() {
                Ok(body)
            } else {
                Err(parse_error(status, &body))
            }
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Timeout(self.timeout)),
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T, ServiceError> {
        debug!("{method} {}{path}", self.base_url);
        let result = self.execute(builder).await.and_then(|text| decode(&text));
        if let Err(ref e) = result {
            warn!("{method} {path} failed: {e}");
        }
        result
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let builder = self.builder(Method::GET, path);
        self.fetch(builder, Method::GET, path).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self.builder(Method::POST, path).json(body);
        self.fetch(builder, Method::POST, path).await
    }

    async fn put_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self.builder(Method::PUT, path).json(body);
        self.fetch(builder, Method::PUT, path).await
    }

    async fn delete_req(&self, path: &str) -> Result<ApiMessage, ServiceError> {
        let builder = self.builder(Method::DELETE, path);
        self.fetch(builder, Method::DELETE, path).await
    }
}

fn decode<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ServiceError> {
    serde_json::from_str(text).map_err(|e| ServiceError::Decode(format!("json decode: {e}")))
}

fn parse_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string());
    ServiceError::Http {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl HabitService for HttpService {
    async fn list_habits(&self) -> Result<Vec<Habit>, ServiceError> {
        self.get_json("/habits").await
    }

    async fn get_habit(&self, id: i64) -> Result<Habit, ServiceError> {
        self.get_json(&format!("/habits/{id}")).await
    }

    async fn create_habit(&self, input: &CreateHabit) -> Result<ApiMessage, ServiceError> {
        self.post_json("/habits", input).await
    }

    async fn update_habit(
        &self,
        id: i64,
        update: &UpdateHabit,
    ) -> Result<ApiMessage, ServiceError> {
        self.put_json(&format!("/habits/{id}"), update).await
    }

    async fn delete_habit(&self, id: i64) -> Result<ApiMessage, ServiceError> {
        self.delete_req(&format!("/habits/{id}")).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.get_json("/categories").await
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<ApiMessage, ServiceError> {
        self.post_json("/categories", input).await
    }

    async fn create_record(&self, input: &CreateRecord) -> Result<ApiMessage, ServiceError> {
        self.post_json("/records", input).await
    }

    async fn list_records(&self, habit_id: i64, days: u32) -> Result<Vec<Record>, ServiceError> {
        self.get_json(&format!("/records/{habit_id}?days={days}"))
            .await
    }

    async fn heatmap(&self, habit_id: i64) -> Result<Vec<HeatmapEntry>, ServiceError> {
        self.get_json(&format!("/records/heatmap/{habit_id}"))
            .await
    }

    async fn stats_overview(&self) -> Result<StatsOverview, ServiceError> {
        self.get_json("/stats/overview").await
    }

    async fn stats_comparison(&self) -> Result<Vec<HabitComparison>, ServiceError> {
        self.get_json("/stats/comparison").await
    }

    async fn check_health(&self) -> bool {
        let builder = self
            .client
            .get(&self.health_url)
            .header(CONTENT_TYPE, "application/json");
        match self.execute(builder).await {
            Ok(_) => true,
            Err(e) => {
                warn!("health check against {} failed: {e}", self.health_url);
                false
            }
        }
    }
}
