/// Registration and login endpoints
use crate::{
    account::{AuthOutcome, LoginRequest, RegisterRequest},
    context::AppContext,
    error::{RosterError, RosterResult},
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

/// Build auth routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Register endpoint
async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> RosterResult<(StatusCode, Json<RegisterResponse>)> {
    tracing::debug!("register: {}", req.username);

    let account = ctx
        .account_manager
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            id: account.id,
        }),
    ))
}

/// Login endpoint
async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> RosterResult<Json<LoginResponse>> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(RosterError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    match ctx
        .account_manager
        .verify(&req.username, &req.password)
        .await?
    {
        AuthOutcome::Authenticated(account) => {
            tracing::info!("login: {} authenticated", account.username);
            Ok(Json(LoginResponse {
                message: "Login successful".to_string(),
                id: account.id,
                username: account.username,
                email: account.email,
            }))
        }
        AuthOutcome::Banned => {
            tracing::warn!("login: banned account {} refused", req.username);
            Err(RosterError::Banned(
                "This account has been banned".to_string(),
            ))
        }
        AuthOutcome::Rejected => {
            tracing::warn!("login: bad credentials for {}", req.username);
            Err(RosterError::Authentication(
                "Invalid username or password".to_string(),
            ))
        }
    }
}
