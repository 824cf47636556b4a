/// Integration settings endpoints
use crate::{
    api::MessageResponse,
    context::AppContext,
    db::settings::IntegrationSettings,
    error::{RosterError, RosterResult},
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// Build settings routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/settings/get", get(get_settings))
        .route("/settings/save", post(save_settings))
}

/// Current settings, `{}` before the first save
async fn get_settings(State(ctx): State<AppContext>) -> RosterResult<Json<serde_json::Value>> {
    let body = match ctx.settings_manager.get().await? {
        Some(settings) => serde_json::to_value(settings)
            .map_err(|e| RosterError::Internal(format!("Failed to encode settings: {}", e)))?,
        None => json!({}),
    };

    Ok(Json(body))
}

async fn save_settings(
    State(ctx): State<AppContext>,
    Json(settings): Json<IntegrationSettings>,
) -> RosterResult<Json<MessageResponse>> {
    ctx.settings_manager.save(&settings).await?;

    Ok(MessageResponse::json("Settings saved"))
}
