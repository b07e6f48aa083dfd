use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use super::service::ListService;
use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::{Contact, ContactList};
use crate::shared::state::AppState;

pub fn list_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/lists", get(list_lists).post(create_list))
        .route("/api/lists/:id", get(get_list).delete(delete_list))
        .route("/api/lists/:id/contacts", get(materialize_list))
        .route("/api/lists/:id/members", post(add_members))
        .route("/api/lists/:id/members/remove", post(remove_members))
}

async fn create_list(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateListRequest>,
) -> Result<Json<ContactList>, CrmError> {
    let service = ListService::new(state.store.clone());
    Ok(Json(service.create_list(req).await?))
}

async fn list_lists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ListView>>, CrmError> {
    let service = ListService::new(state.store.clone());
    Ok(Json(service.list_lists().await?))
}

async fn get_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListView>, CrmError> {
    let service = ListService::new(state.store.clone());
    Ok(Json(service.get_list(id).await?))
}

async fn materialize_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Contact>>, CrmError> {
    let service = ListService::new(state.store.clone());
    Ok(Json(service.materialize(id).await?))
}

async fn add_members(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<MembersRequest>,
) -> Result<Json<AddMembersResult>, CrmError> {
    let service = ListService::new(state.store.clone());
    Ok(Json(service.add_members(id, &req.contact_ids).await?))
}

async fn remove_members(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<MembersRequest>,
) -> Result<Json<RemoveMembersResult>, CrmError> {
    let service = ListService::new(state.store.clone());
    Ok(Json(service.remove_members(id, &req.contact_ids).await?))
}

async fn delete_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, CrmError> {
    let service = ListService::new(state.store.clone());
    service.delete_list(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
