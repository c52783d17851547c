//! Dry-run calculation endpoints. Nothing here is persisted.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{RoyaltyCalculation, TitleId};
use crate::error::AppError;
use crate::orchestration::CalculationInput;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub calculation: RoyaltyCalculation,
    pub fingerprint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPreviewRequest {
    pub items: Vec<CalculationInput>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPreviewResponse {
    pub results: Vec<BatchPreviewItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPreviewItem {
    pub title_id: TitleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation: Option<RoyaltyCalculation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

pub async fn preview_calculation(
    State(state): State<AppState>,
    payload: Result<Json<CalculationInput>, JsonRejection>,
) -> Result<Json<PreviewResponse>, AppError> {
    let input = decode(payload)?;
    let preview_id = Uuid::new_v4();

    tracing::info!(%preview_id, title_id = %input.title_id, "preview requested");

    let calculation = state.calculator.calculate(&input).map_err(|err| {
        tracing::warn!(%preview_id, error = %err, "preview rejected");
        AppError::from(err)
    })?;
    let fingerprint = calculation.fingerprint()?;

    Ok(Json(PreviewResponse {
        calculation,
        fingerprint,
    }))
}

pub async fn preview_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchPreviewRequest>, JsonRejection>,
) -> Result<Json<BatchPreviewResponse>, AppError> {
    let request = decode(payload)?;

    if request.items.is_empty() {
        return Err(AppError::BadRequest("items must not be empty".to_string()));
    }
    if request.items.len() > state.config.max_batch_size {
        return Err(AppError::BadRequest(format!(
            "batch of {} exceeds limit of {}",
            request.items.len(),
            state.config.max_batch_size
        )));
    }

    tracing::info!(items = request.items.len(), "batch preview requested");

    let outcomes = state.calculator.calculate_batch(&request.items);
    let mut results = Vec::with_capacity(outcomes.len());
    for (input, outcome) in request.items.iter().zip(outcomes) {
        let item = match outcome {
            Ok(calculation) => BatchPreviewItem {
                title_id: input.title_id,
                fingerprint: Some(calculation.fingerprint()?),
                calculation: Some(calculation),
                error: None,
            },
            Err(err) => BatchPreviewItem {
                title_id: input.title_id,
                calculation: None,
                fingerprint: None,
                error: Some(err.to_string()),
            },
        };
        results.push(item);
    }

    Ok(Json(BatchPreviewResponse { results }))
}
