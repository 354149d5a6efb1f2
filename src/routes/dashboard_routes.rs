use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::car_form_controller::{CarFormController, SubmitOutcome};
use crate::controllers::fleet_controller::FleetController;
use crate::dto::api_response::ApiResponse;
use crate::dto::car_dto::{CarFormInput, CarListQuery, CarTableResponse};
use crate::models::car::{Car, CarStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas protegidas del dashboard; se montan bajo `/dashboard`
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_stats))
        .route("/cars", get(list_cars))
        .route("/cars/add", post(add_car))
        .route("/cars/:id", get(get_car).delete(delete_car))
        .route("/cars/:id/edit", post(edit_car))
}

/// Página de login (placeholder JSON) y health check
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/health", get(health))
}

async fn login_page() -> Json<serde_json::Value> {
    Json(json!({
        "page": "login",
        "action": "/api/auth/login",
        "fields": ["password"]
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<CarStats>, AppError> {
    let controller = FleetController::new(state.store.clone());
    Ok(Json(controller.stats().await?))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<CarListQuery>,
) -> Result<Json<CarTableResponse>, AppError> {
    let controller = FleetController::new(state.store.clone());
    Ok(Json(controller.list(query).await?))
}

async fn get_car(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Car>, AppError> {
    let controller = FleetController::new(state.store.clone());
    Ok(Json(controller.get(id).await?))
}

async fn add_car(
    State(state): State<AppState>,
    Json(form): Json<CarFormInput>,
) -> Result<(StatusCode, Json<ApiResponse<Car>>), AppError> {
    let controller = CarFormController::new(state.store.clone(), state.form_variant).with_values(form);
    let car = submit(&controller).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(car, "Car added successfully")),
    ))
}

async fn edit_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<CarFormInput>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let existing = FleetController::new(state.store.clone()).get(id).await?;
    let controller =
        CarFormController::for_edit(state.store.clone(), state.form_variant, &existing).with_values(form);
    let car = submit(&controller).await?;
    Ok(Json(ApiResponse::success_with_message(car, "Car updated successfully")))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    FleetController::new(state.store.clone()).delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn submit(controller: &CarFormController<dyn crate::repositories::CarStore>) -> Result<Car, AppError> {
    match controller.submit().await {
        SubmitOutcome::Saved(car) => Ok(car),
        SubmitOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        SubmitOutcome::Failed(e) => Err(e.into()),
        SubmitOutcome::AlreadySubmitting => Err(AppError::Conflict("A submission is already in progress".to_string())),
    }
}
