/// API routes and handlers
pub mod auth;
pub mod players;
pub mod settings;
pub mod users;

use crate::context::AppContext;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(auth::routes())
        .merge(settings::routes())
        .merge(users::routes())
        .merge(players::routes())
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn json(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}
