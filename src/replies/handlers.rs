use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use super::service::ReplyService;
use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::{Activity, Contact, InboundMessage};
use crate::shared::state::AppState;

pub fn reply_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/replies", get(list_messages).post(record_inbound))
        .route("/api/replies/search", get(search_contacts))
        .route("/api/replies/:id/link", post(link_to_contact))
        .route("/api/replies/:id/contact", post(create_contact_from_message))
        .route("/api/replies/:id/spam", post(mark_spam))
        .route("/api/replies/:id/restore", post(restore))
        .route("/api/contacts/:id/activities", get(list_activities))
}

async fn record_inbound(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordInboundRequest>,
) -> Result<Json<InboundMessage>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(service.record_inbound(req).await?))
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<Vec<InboundMessage>>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(service.list_messages(query.status).await?))
}

async fn search_contacts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Contact>>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(service.search(&query.q).await?))
}

async fn link_to_contact(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
    Json(req): Json<LinkRequest>,
) -> Result<Json<InboundMessage>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(
        service
            .link_to_contact(message_id, req.contact_id, req.operator_id)
            .await?,
    ))
}

async fn create_contact_from_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
    Json(req): Json<CreateContactFromMessageRequest>,
) -> Result<Json<(Contact, InboundMessage)>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(
        service.create_contact_from_message(message_id, req).await?,
    ))
}

async fn mark_spam(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<InboundMessage>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(service.mark_spam(message_id).await?))
}

async fn restore(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<InboundMessage>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(service.restore(message_id).await?))
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<Vec<Activity>>, CrmError> {
    let service = ReplyService::new(state.store.clone());
    Ok(Json(service.list_activities(contact_id).await?))
}
