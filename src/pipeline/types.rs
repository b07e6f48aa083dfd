use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::models::{Deal, Pipeline, Stage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipelineRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStageRequest {
    pub name: String,
    pub color: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderStageRequest {
    pub new_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStageQuery {
    pub target_stage_id: Option<Uuid>,
}

/// Contact fields supplied when a deal should create its contact on
/// the fly (e.g. a walk-in lead entered straight onto the board).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContactFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Exactly one of `contact_id` / `contact` must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDealRequest {
    pub contact_id: Option<Uuid>,
    pub contact: Option<NewContactFields>,
    pub stage_id: Option<Uuid>,
    pub recruiter_id: Option<Uuid>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDealRequest {
    pub to_stage_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseDealRequest {
    pub won: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMoveRequest {
    pub to_stage_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMoveResult {
    pub moved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageView {
    #[serde(flatten)]
    pub stage: Stage,
    pub deal_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineView {
    #[serde(flatten)]
    pub pipeline: Pipeline,
    pub stages: Vec<StageView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardColumn {
    pub stage: Stage,
    pub deals: Vec<Deal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardView {
    pub pipeline_id: Uuid,
    pub columns: Vec<BoardColumn>,
}
