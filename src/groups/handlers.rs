use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use super::service::GroupService;
use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::Group;
use crate::shared::state::AppState;

pub fn group_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/groups", get(list_groups).post(create_group))
        .route("/api/groups/:id", get(get_group).delete(delete_group))
        .route("/api/groups/:id/members", post(add_to_group))
        .route("/api/groups/:id/members/remove", post(remove_from_group))
}

async fn create_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<Group>, CrmError> {
    let service = GroupService::new(state.store.clone());
    Ok(Json(service.create_group(req).await?))
}

async fn list_groups(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Group>>, CrmError> {
    let service = GroupService::new(state.store.clone());
    Ok(Json(service.list_groups().await?))
}

async fn get_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Group>, CrmError> {
    let service = GroupService::new(state.store.clone());
    Ok(Json(service.get_group(id).await?))
}

async fn add_to_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<GroupMembersRequest>,
) -> Result<Json<GroupMutationResult>, CrmError> {
    let service = GroupService::new(state.store.clone());
    Ok(Json(service.add_to_group(id, &req.contact_ids).await?))
}

async fn remove_from_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<GroupMembersRequest>,
) -> Result<Json<GroupMutationResult>, CrmError> {
    let service = GroupService::new(state.store.clone());
    Ok(Json(service.remove_from_group(id, &req.contact_ids).await?))
}

async fn delete_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, CrmError> {
    let service = GroupService::new(state.store.clone());
    service.delete_group(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
