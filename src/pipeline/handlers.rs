use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use super::service::PipelineService;
use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::{Deal, Pipeline, Stage};
use crate::shared::state::AppState;

pub fn pipeline_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pipelines", get(list_pipelines).post(create_pipeline))
        .route(
            "/api/pipelines/:id",
            get(get_pipeline).delete(delete_pipeline),
        )
        .route("/api/pipelines/:id/stages", post(create_stage))
        .route("/api/pipelines/:id/board", get(get_board))
        .route("/api/pipelines/:id/deals", post(create_deal))
        .route("/api/stages/:id", axum::routing::delete(delete_stage))
        .route("/api/stages/:id/reorder", post(reorder_stage))
        .route("/api/stages/:id/move-deals", post(bulk_move_deals))
        .route("/api/deals/:id/move", post(move_deal))
        .route("/api/deals/:id/close", post(close_deal))
}

async fn create_pipeline(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePipelineRequest>,
) -> Result<Json<Pipeline>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.create_pipeline(req).await?))
}

async fn list_pipelines(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Pipeline>>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.list_pipelines().await?))
}

async fn get_pipeline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PipelineView>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.get_pipeline(id).await?))
}

async fn delete_pipeline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, CrmError> {
    let service = PipelineService::new(state.store.clone());
    service.delete_pipeline(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_stage(
    State(state): State<Arc<AppState>>,
    Path(pipeline_id): Path<Uuid>,
    Json(req): Json<CreateStageRequest>,
) -> Result<Json<Stage>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.create_stage(pipeline_id, req).await?))
}

async fn reorder_stage(
    State(state): State<Arc<AppState>>,
    Path(stage_id): Path<Uuid>,
    Json(req): Json<ReorderStageRequest>,
) -> Result<Json<Stage>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.reorder_stage(stage_id, req.new_order).await?))
}

async fn delete_stage(
    State(state): State<Arc<AppState>>,
    Path(stage_id): Path<Uuid>,
    Query(query): Query<DeleteStageQuery>,
) -> Result<StatusCode, CrmError> {
    let service = PipelineService::new(state.store.clone());
    service.delete_stage(stage_id, query.target_stage_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_move_deals(
    State(state): State<Arc<AppState>>,
    Path(from_stage_id): Path<Uuid>,
    Json(req): Json<BulkMoveRequest>,
) -> Result<Json<BulkMoveResult>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(
        service.bulk_move_deals(from_stage_id, req.to_stage_id).await?,
    ))
}

async fn create_deal(
    State(state): State<Arc<AppState>>,
    Path(pipeline_id): Path<Uuid>,
    Json(req): Json<CreateDealRequest>,
) -> Result<Json<Deal>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.create_deal(pipeline_id, req).await?))
}

async fn move_deal(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<Uuid>,
    Json(req): Json<MoveDealRequest>,
) -> Result<Json<Deal>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.move_deal(deal_id, req.to_stage_id).await?))
}

async fn close_deal(
    State(state): State<Arc<AppState>>,
    Path(deal_id): Path<Uuid>,
    Json(req): Json<CloseDealRequest>,
) -> Result<Json<Deal>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.close_deal(deal_id, req.won).await?))
}

async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(pipeline_id): Path<Uuid>,
) -> Result<Json<BoardView>, CrmError> {
    let service = PipelineService::new(state.store.clone());
    Ok(Json(service.board(pipeline_id).await?))
}
