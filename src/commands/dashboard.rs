use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;

use crate::models::{DashboardSettings, DashboardView};
use crate::services::page::render_page;
use crate::services::renderer::{render_dashboard, RenderOptions};
use crate::services::Poller;

#[derive(Clone)]
pub struct AppState {
    pub poller: Arc<Poller>,
    pub options: Arc<RenderOptions>,
    pub app_name: String,
}

impl AppState {
    pub fn new(poller: Arc<Poller>, settings: &DashboardSettings, app_name: impl Into<String>) -> Self {
        Self {
            poller,
            options: Arc::new(settings.into()),
            app_name: app_name.into(),
        }
    }

    fn current_view(&self) -> DashboardView {
        let snapshot = self.poller.state().snapshot();
        render_dashboard(&snapshot, &Local::now(), &self.options)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_dashboard_page))
        .route("/api/dashboard", get(get_dashboard_overview))
        .route("/api/refresh", post(refresh_dashboard_overview))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_dashboard_page(State(s): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    render_page(&s.current_view())
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn get_dashboard_overview(State(s): State<AppState>) -> Json<DashboardView> {
    Json(s.current_view())
}

async fn refresh_dashboard_overview(State(s): State<AppState>) -> impl IntoResponse {
    if s.poller.refresh_now() {
        (StatusCode::ACCEPTED, Json(serde_json::json!({"status": "refresh scheduled"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"status": "poller stopped"})),
        )
    }
}

async fn health(State(s): State<AppState>) -> impl IntoResponse {
    let status = s.poller.state().snapshot().status;
    Json(serde_json::json!({
        "status": "ok",
        "service": s.app_name,
        "polling": s.poller.is_running(),
        "cycles": status.cycles,
        "last_success": status.last_success,
        "last_failure": status.last_failure,
        "consecutive_failures": status.consecutive_failures,
    }))
}
