//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::warn;

use crate::datamall::DataMallError;
use crate::domain::StopCode;
use crate::scheduler::SchedulerError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Default and maximum page sizes for the stop search.
const DEFAULT_STOP_LIMIT: usize = 25;
const MAX_STOP_LIMIT: usize = 100;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    // the JSON API is open to other frontends
    let api = Router::new()
        .route("/stops", get(list_stops))
        .route("/services", get(list_services))
        .route("/routes", get(service_routes))
        .route("/arrivals", get(stop_arrivals))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/scheduler/tasks", get(list_tasks))
        .route("/scheduler/:id/trigger", post(trigger_task))
        .route("/scheduler/:id/stop", post(stop_task))
        .route("/scheduler/:id/enable", post(enable_task))
        .route("/scheduler/:id/disable", post(disable_task))
        .nest("/api/v1", api)
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check with dataset counts and freshness.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.store.stats().await;
    Json(HealthResponse::from_stats(&stats))
}

/// Dashboard page.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let tasks: Vec<TaskView> = state
        .scheduler
        .tasks()
        .iter()
        .map(TaskView::from_snapshot)
        .collect();
    let datasets = DatasetView::from_stats(&state.store.stats().await);

    let template = IndexTemplate { tasks, datasets };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

/// List registered scheduler tasks.
async fn list_tasks(State(state): State<AppState>) -> Json<TasksResponse> {
    let tasks = state
        .scheduler
        .tasks()
        .iter()
        .map(TaskResult::from_snapshot)
        .collect();
    Json(TasksResponse { tasks })
}

/// Run a task now, outside its cadence.
async fn trigger_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskActionResponse>, AppError> {
    state.scheduler.trigger_task(&id)?;
    Ok(Json(TaskActionResponse {
        task: id,
        status: "triggered",
    }))
}

/// Ask a running task to stop.
async fn stop_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskActionResponse>, AppError> {
    state.scheduler.stop_task(&id)?;
    Ok(Json(TaskActionResponse {
        task: id,
        status: "stopped",
    }))
}

/// Start a task's periodic driver.
async fn enable_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskActionResponse>, AppError> {
    state.scheduler.enable_task(&id)?;
    Ok(Json(TaskActionResponse {
        task: id,
        status: "enabled",
    }))
}

/// Stop a task's periodic driver.
async fn disable_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskActionResponse>, AppError> {
    state.scheduler.disable_task(&id)?;
    Ok(Json(TaskActionResponse {
        task: id,
        status: "disabled",
    }))
}

/// Search stored bus stops.
async fn list_stops(
    State(state): State<AppState>,
    Query(query): Query<StopsQuery>,
) -> Json<StopsResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_STOP_LIMIT).min(MAX_STOP_LIMIT);
    let stops = state.store.search_stops(query.search.as_deref(), limit).await;
    Json(StopsResponse {
        stops: stops.iter().map(StopResult::from_stop).collect(),
    })
}

/// List every stored service direction.
async fn list_services(State(state): State<AppState>) -> Json<ServicesResponse> {
    let services = state.store.services().await;
    Json(ServicesResponse {
        services: services.iter().map(ServiceResult::from_service).collect(),
    })
}

/// List the route of one service, optionally filtered by direction.
async fn service_routes(
    State(state): State<AppState>,
    Query(query): Query<RoutesQuery>,
) -> Result<Json<RoutesResponse>, AppError> {
    let service = query.service.trim();
    if service.is_empty() {
        return Err(AppError::BadRequest {
            message: "service must not be empty".to_string(),
        });
    }

    let routes = state.store.routes_for_service(service, query.direction).await;
    Ok(Json(RoutesResponse {
        service: service.to_string(),
        routes: routes.iter().map(RouteStopResult::from_route).collect(),
    }))
}

/// Live arrivals for one stop, fetched straight from the upstream.
async fn stop_arrivals(
    State(state): State<AppState>,
    Query(query): Query<ArrivalsQuery>,
) -> Result<Json<ArrivalsResponse>, AppError> {
    let code = StopCode::parse(&query.stop).map_err(|_| AppError::BadRequest {
        message: format!("invalid bus stop code {:?}", query.stop),
    })?;
    let service_no = query
        .service
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let arrival = state.api.get_bus_arrival(&code, service_no).await?;
    Ok(Json(ArrivalsResponse::from_arrival(&arrival, Utc::now())))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<SchedulerError> for AppError {
    fn from(e: SchedulerError) -> Self {
        match e {
            SchedulerError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            // the task exists but is in the wrong state for the action
            _ => AppError::Conflict {
                message: e.to_string(),
            },
        }
    }
}

impl From<DataMallError> for AppError {
    fn from(e: DataMallError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
