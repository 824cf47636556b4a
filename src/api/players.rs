/// Player roster endpoints
use crate::{
    api::MessageResponse,
    context::AppContext,
    error::RosterResult,
    roster::{
        parse_group, AddPlayerRequest, BatchDeleteRequest, PermissionGroup,
        PermissionGroupRequest, PlayerDetails, PlayerDetailsRequest, PlayerRecord, PlayerSummary,
        SearchQuery,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build player routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/players", get(list_players).post(add_player))
        .route("/players/search", get(search_players))
        .route("/players/engineer-groups", get(list_engineers))
        .route("/players/batch-delete", post(batch_delete_players))
        .route(
            "/players/:game_id",
            put(edit_player).delete(delete_player),
        )
        .route(
            "/players/:game_id/permission-group",
            put(update_permission_group),
        )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchDeleteResponse {
    pub message: String,
    pub deleted: u64,
}

async fn list_players(State(ctx): State<AppContext>) -> RosterResult<Json<Vec<PlayerSummary>>> {
    Ok(Json(ctx.roster_manager.list().await?))
}

async fn add_player(
    State(ctx): State<AppContext>,
    Json(req): Json<AddPlayerRequest>,
) -> RosterResult<(StatusCode, Json<MessageResponse>)> {
    let record = PlayerRecord::try_from(req)?;
    ctx.roster_manager.add(&record).await?;

    Ok((StatusCode::CREATED, MessageResponse::json("Player added")))
}

async fn edit_player(
    State(ctx): State<AppContext>,
    Path(game_id): Path<String>,
    Json(req): Json<PlayerDetailsRequest>,
) -> RosterResult<Json<MessageResponse>> {
    let details = PlayerDetails::try_from(req)?;
    ctx.roster_manager.edit(&game_id, &details).await?;

    Ok(MessageResponse::json("Player updated"))
}

async fn delete_player(
    State(ctx): State<AppContext>,
    Path(game_id): Path<String>,
) -> RosterResult<Json<MessageResponse>> {
    ctx.roster_manager.delete(&game_id).await?;

    Ok(MessageResponse::json("Player deleted"))
}

async fn batch_delete_players(
    State(ctx): State<AppContext>,
    Json(req): Json<BatchDeleteRequest>,
) -> RosterResult<Json<BatchDeleteResponse>> {
    let deleted = ctx.roster_manager.batch_delete(&req.game_ids).await?;

    Ok(Json(BatchDeleteResponse {
        message: "Players deleted".to_string(),
        deleted,
    }))
}

async fn search_players(
    State(ctx): State<AppContext>,
    Query(query): Query<SearchQuery>,
) -> RosterResult<Json<Vec<PlayerSummary>>> {
    Ok(Json(ctx.roster_manager.search(&query.keyword).await?))
}

async fn list_engineers(State(ctx): State<AppContext>) -> RosterResult<Json<Vec<PlayerSummary>>> {
    Ok(Json(
        ctx.roster_manager
            .list_by_groups(&PermissionGroup::ENGINEERS)
            .await?,
    ))
}

async fn update_permission_group(
    State(ctx): State<AppContext>,
    Path(game_id): Path<String>,
    Json(req): Json<PermissionGroupRequest>,
) -> RosterResult<Json<MessageResponse>> {
    let group = parse_group(req.permission_group.as_deref())?;
    ctx.roster_manager
        .update_permission_group(&game_id, group)
        .await?;

    Ok(MessageResponse::json("Permission group updated"))
}
