use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::Deserialize;
use tracing::info;

use wedding_common::model::{Attendance, GuestRecord};
use wedding_common::store::GuestStore;

use crate::auth::require_api_key;
use crate::config::Config;
use crate::error::AppError;
use crate::export::{build_csv_with_bom, CSV_FILE_NAME};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<GuestStore>,
}

impl AppState {
    pub fn new(config: Config, store: GuestStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

/// Body of `POST /guests`: several names answering the same way.
#[derive(Debug, Deserialize)]
pub struct GuestResponseCreate {
    pub guests: Vec<String>,
    pub attendance: Attendance,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/guests",
            post(create_guest_responses).get(list_guest_responses),
        )
        .route("/guests/csv", get(export_guest_responses_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

async fn create_guest_responses(
    State(state): State<AppState>,
    payload: Result<Json<GuestResponseCreate>, JsonRejection>,
) -> Result<Json<Vec<GuestRecord>>, AppError> {
    let Json(payload) = payload?;
    if payload.guests.is_empty() {
        return Err(AppError::Validation(
            "guests must contain at least one name".to_string(),
        ));
    }

    let created = state.store.append(&payload.guests, payload.attendance).await?;
    info!(
        count = created.len(),
        attendance = payload.attendance.code(),
        "recorded guest responses"
    );
    Ok(Json(created))
}

async fn list_guest_responses(
    State(state): State<AppState>,
) -> Result<Json<Vec<GuestRecord>>, AppError> {
    let records = state.store.read_all().await?;
    Ok(Json(records))
}

async fn export_guest_responses_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.store.read_all().await?;
    let body = build_csv_with_bom(&records)?;
    info!(count = records.len(), "exported guest responses");
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={CSV_FILE_NAME}"),
            ),
        ],
        body,
    ))
}
