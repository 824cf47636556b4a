/// Account administration endpoints
use crate::{
    account::{AccountSummary, EditAccountRequest},
    api::MessageResponse,
    context::AppContext,
    error::RosterResult,
};
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", put(edit_user).delete(delete_user))
        .route("/users/:id/ban", put(ban_user))
        .route("/users/:id/unban", put(unban_user))
}

async fn list_users(State(ctx): State<AppContext>) -> RosterResult<Json<Vec<AccountSummary>>> {
    Ok(Json(ctx.account_manager.list().await?))
}

async fn edit_user(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    Json(req): Json<EditAccountRequest>,
) -> RosterResult<Json<MessageResponse>> {
    ctx.account_manager
        .edit(id, &req.username, &req.email, &req.password)
        .await?;

    Ok(MessageResponse::json("User updated"))
}

async fn delete_user(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> RosterResult<Json<MessageResponse>> {
    ctx.account_manager.delete(id).await?;

    Ok(MessageResponse::json("User deleted"))
}

async fn ban_user(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> RosterResult<Json<MessageResponse>> {
    ctx.account_manager.set_active(id, false).await?;

    Ok(MessageResponse::json("User banned"))
}

async fn unban_user(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> RosterResult<Json<MessageResponse>> {
    ctx.account_manager.set_active(id, true).await?;

    Ok(MessageResponse::json("User unbanned"))
}
