use axum::extract::State;
use axum::Json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Readiness plus the calculation settings this instance applies.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let options = state.calculator.options();
    Json(serde_json::json!({
        "status": "ready",
        "roundingMode": options.rounding,
        "ownershipPolicy": options.ownership_policy,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_reports_options() {
        let Json(body) = ready(State(AppState::new(Config::default()))).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["roundingMode"], "half_up");
        assert_eq!(body["ownershipPolicy"], "strict");
    }
}
