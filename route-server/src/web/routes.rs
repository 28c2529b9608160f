//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::cache::CacheStore;
use crate::domain::{DomainError, EdgeId, Location, LocationId};
use crate::planner::{RouteError, RouteQuery};
use crate::service::ServiceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(find_routes))
        .route("/api/routes/locations", get(list_locations))
        .route("/api/locations", get(list_locations).post(create_location))
        .route(
            "/api/locations/:id",
            get(get_location).put(update_location).delete(delete_location),
        )
        .route(
            "/api/transportations",
            get(list_transportations).post(create_transportation),
        )
        .route(
            "/api/transportations/:id",
            get(get_transportation)
                .put(update_transportation)
                .delete(delete_transportation),
        )
        .route("/api/cache/stats", get(cache_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Find every route between two locations on a date.
async fn find_routes(
    State(state): State<AppState>,
    query: Result<Query<RouteSearchRequest>, QueryRejection>,
) -> Result<Json<Vec<RouteResult>>, AppError> {
    let Query(req) = query.map_err(AppError::bad_request)?;
    let query = RouteQuery::parse(req.origin_id, req.destination_id, &req.date)?;

    let routes = state.service.find_routes(&query).await?;
    tracing::info!(
        origin = %query.origin,
        destination = %query.destination,
        date = %query.date,
        routes = routes.len(),
        "route search"
    );

    Ok(Json(routes.iter().map(RouteResult::from_itinerary).collect()))
}

async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>, AppError> {
    Ok(Json(state.service.list_locations().await?))
}

async fn get_location(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Location>, AppError> {
    let Path(id) = id.map_err(AppError::bad_request)?;
    Ok(Json(state.service.get_location(LocationId(id)).await?))
}

async fn create_location(
    State(state): State<AppState>,
    body: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Location>), AppError> {
    let Json(req) = body.map_err(AppError::bad_request)?;
    let location = state.service.create_location(req.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

async fn update_location(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<Location>, AppError> {
    let Path(id) = id.map_err(AppError::bad_request)?;
    let Json(req) = body.map_err(AppError::bad_request)?;
    let location = state
        .service
        .update_location(LocationId(id), req.into_draft()?)
        .await?;
    Ok(Json(location))
}

async fn delete_location(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(AppError::bad_request)?;
    state.service.delete_location(LocationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_transportations(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransportationResult>>, AppError> {
    let edges = state.service.list_transportations().await?;
    Ok(Json(edges.iter().map(TransportationResult::from_edge).collect()))
}

async fn get_transportation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TransportationResult>, AppError> {
    let Path(id) = id.map_err(AppError::bad_request)?;
    let edge = state.service.get_transportation(EdgeId(id)).await?;
    Ok(Json(TransportationResult::from_edge(&edge)))
}

async fn create_transportation(
    State(state): State<AppState>,
    body: Result<Json<TransportationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransportationResult>), AppError> {
    let Json(req) = body.map_err(AppError::bad_request)?;
    let edge = state.service.create_transportation(req.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(TransportationResult::from_edge(&edge))))
}

async fn update_transportation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TransportationRequest>, JsonRejection>,
) -> Result<Json<TransportationResult>, AppError> {
    let Path(id) = id.map_err(AppError::bad_request)?;
    let Json(req) = body.map_err(AppError::bad_request)?;
    let edge = state
        .service
        .update_transportation(EdgeId(id), req.into_draft()?)
        .await?;
    Ok(Json(TransportationResult::from_edge(&edge)))
}

async fn delete_transportation(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(AppError::bad_request)?;
    state.service.delete_transportation(EdgeId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cache counters since startup.
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let store = state.service.cache().store();
    Json(CacheStatsResponse {
        stats: store.stats(),
        entries: store.entry_count(),
    })
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

impl AppError {
    fn bad_request(e: impl std::fmt::Display) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(message) => AppError::NotFound { message },
            ServiceError::InvalidInput(message) => AppError::BadRequest { message },
            ServiceError::Conflict(message) => AppError::Conflict { message },
            ServiceError::EdgeSource(message) => AppError::BadGateway { message },
            ServiceError::Unavailable(message) => AppError::Internal { message },
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        ServiceError::from(e).into()
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::bad_request(e)
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

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
