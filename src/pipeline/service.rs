use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::{Contact, ContactPatch, ContactSnapshot, Deal, Pipeline, Stage};
use crate::store::CrmStore;

/// Owns the ordered stage sequence of each pipeline and the assignment
/// of every deal to exactly one stage of its pipeline. Stages carry no
/// global meaning, so a deal may move to any stage in any order; the
/// engine only enforces the structural invariants.
pub struct PipelineService {
    store: Arc<dyn CrmStore>,
}

impl PipelineService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create_pipeline(&self, req: CreatePipelineRequest) -> Result<Pipeline, CrmError> {
        if req.name.trim().is_empty() {
            return Err(CrmError::Validation("pipeline name is required".into()));
        }
        let pipeline = Pipeline {
            id: Uuid::new_v4(),
            name: req.name,
            created_at: Utc::now(),
        };
        info!(pipeline = %pipeline.name, "creating pipeline");
        self.store.insert_pipeline(pipeline).await
    }

    pub async fn list_pipelines(&self) -> Result<Vec<Pipeline>, CrmError> {
        self.store.list_pipelines().await
    }

    pub async fn get_pipeline(&self, id: Uuid) -> Result<PipelineView, CrmError> {
        let pipeline = self.store.get_pipeline(id).await?;
        let stages = self.store.list_stages(id).await?;
        let mut views = Vec::with_capacity(stages.len());
        for stage in stages {
            let deals = self.store.list_deals_by_stage(stage.id).await?;
            views.push(StageView {
                stage,
                deal_count: deals.len(),
            });
        }
        Ok(PipelineView {
            pipeline,
            stages: views,
        })
    }

    /// Deleting a pipeline cascades to its stages and closed deals.
    /// Open deals block the delete so nobody silently loses a lead.
    pub async fn delete_pipeline(&self, id: Uuid) -> Result<(), CrmError> {
        self.store.get_pipeline(id).await?;
        let deals = self.store.list_deals_by_pipeline(id).await?;
        if deals.iter().any(|d| d.won.is_none()) {
            return Err(CrmError::Conflict("pipeline has open deals".into()));
        }
        for deal in deals {
            self.store.delete_deal(deal.id).await?;
        }
        for stage in self.store.list_stages(id).await? {
            self.store.delete_stage(stage.id).await?;
        }
        self.store.delete_pipeline(id).await
    }

    /// Inserts a stage at `order`. On collision, every stage at or
    /// after that position is shifted up by one so order values stay
    /// unique within the pipeline.
    pub async fn create_stage(
        &self,
        pipeline_id: Uuid,
        req: CreateStageRequest,
    ) -> Result<Stage, CrmError> {
        self.store.get_pipeline(pipeline_id).await?;
        if req.name.trim().is_empty() {
            return Err(CrmError::Validation("stage name is required".into()));
        }
        let stages = self.store.list_stages(pipeline_id).await?;
        if stages.iter().any(|s| s.stage_order == req.order) {
            for mut stage in stages {
                if stage.stage_order >= req.order {
                    stage.stage_order += 1;
                    self.store.update_stage(stage).await?;
                }
            }
        }
        let stage = Stage {
            id: Uuid::new_v4(),
            pipeline_id,
            name: req.name,
            color: req.color,
            stage_order: req.order,
            created_at: Utc::now(),
        };
        self.store.insert_stage(stage).await
    }

    pub async fn reorder_stage(&self, stage_id: Uuid, new_order: i32) -> Result<Stage, CrmError> {
        let mut stage = self.store.get_stage(stage_id).await?;
        let old_order = stage.stage_order;
        if new_order == old_order {
            return Ok(stage);
        }
        for mut sibling in self.store.list_stages(stage.pipeline_id).await? {
            if sibling.id == stage.id {
                continue;
            }
            let o = sibling.stage_order;
            if new_order > old_order && o > old_order && o <= new_order {
                sibling.stage_order -= 1;
                self.store.update_stage(sibling).await?;
            } else if new_order < old_order && o >= new_order && o < old_order {
                sibling.stage_order += 1;
                self.store.update_stage(sibling).await?;
            }
        }
        stage.stage_order = new_order;
        self.store.update_stage(stage).await
    }

    /// A stage with deals can only go away once its deals have a home:
    /// `target_stage_id` is mandatory, must differ from the deleted
    /// stage and must sit in the same pipeline. Reassignment happens
    /// through [`Self::bulk_move_deals`] before the stage row goes.
    pub async fn delete_stage(
        &self,
        stage_id: Uuid,
        target_stage_id: Option<Uuid>,
    ) -> Result<(), CrmError> {
        let stage = self.store.get_stage(stage_id).await?;
        let deals = self.store.list_deals_by_stage(stage_id).await?;
        if !deals.is_empty() {
            let target_id = target_stage_id
                .ok_or_else(|| CrmError::Validation("deals present, target required".into()))?;
            if target_id == stage_id {
                return Err(CrmError::Validation(
                    "target must differ from deleted stage".into(),
                ));
            }
            let target = self.store.get_stage(target_id).await?;
            if target.pipeline_id != stage.pipeline_id {
                return Err(CrmError::Validation(
                    "target must belong to same pipeline".into(),
                ));
            }
            let moved = self.bulk_move_deals(stage_id, target_id).await?;
            info!(stage = %stage.name, moved = moved.moved, "reassigned deals before stage delete");
        }
        self.store.delete_stage(stage_id).await
    }

    /// Reassigns every deal of one stage to another. Idempotent: a
    /// repeat call with no intervening deals moves nothing and is not
    /// an error.
    pub async fn bulk_move_deals(
        &self,
        from_stage_id: Uuid,
        to_stage_id: Uuid,
    ) -> Result<BulkMoveResult, CrmError> {
        if from_stage_id == to_stage_id {
            return Ok(BulkMoveResult { moved: 0 });
        }
        let from = self.store.get_stage(from_stage_id).await?;
        let to = self.store.get_stage(to_stage_id).await?;
        if from.pipeline_id != to.pipeline_id {
            return Err(CrmError::Conflict(
                "target stage belongs to a different pipeline".into(),
            ));
        }
        let deals = self.store.list_deals_by_stage(from_stage_id).await?;
        let now = Utc::now();
        let mut moved = 0;
        for mut deal in deals {
            deal.stage_id = to_stage_id;
            deal.last_activity_at = now;
            deal.updated_at = now;
            self.store.update_deal(deal).await?;
            moved += 1;
        }
        Ok(BulkMoveResult { moved })
    }

    pub async fn move_deal(&self, deal_id: Uuid, to_stage_id: Uuid) -> Result<Deal, CrmError> {
        let mut deal = self.store.get_deal(deal_id).await?;
        let stage = self.store.get_stage(to_stage_id).await?;
        if stage.pipeline_id != deal.pipeline_id {
            return Err(CrmError::Conflict(
                "target stage belongs to a different pipeline".into(),
            ));
        }
        let now = Utc::now();
        deal.stage_id = stage.id;
        deal.last_activity_at = now;
        deal.updated_at = now;
        let deal = self.store.update_deal(deal).await?;
        // The contact's free-text status tracks the stage label.
        self.store
            .update_contact(
                deal.contact_id,
                ContactPatch {
                    status: Some(stage.name.clone()),
                    ..Default::default()
                },
            )
            .await?;
        Ok(deal)
    }

    /// Places a contact into a pipeline. The contact either already
    /// exists (`contact_id`) or is created first from `contact`
    /// fields. Omitted `stage_id` defaults to the lowest-order stage.
    pub async fn create_deal(
        &self,
        pipeline_id: Uuid,
        req: CreateDealRequest,
    ) -> Result<Deal, CrmError> {
        self.store.get_pipeline(pipeline_id).await?;
        let stages = self.store.list_stages(pipeline_id).await?;
        let Some(first_stage) = stages.first().cloned() else {
            return Err(CrmError::Validation("pipeline has no stages".into()));
        };
        let stage = match req.stage_id {
            Some(id) => {
                let stage = self.store.get_stage(id).await?;
                if stage.pipeline_id != pipeline_id {
                    return Err(CrmError::Conflict(
                        "stage belongs to a different pipeline".into(),
                    ));
                }
                stage
            }
            None => first_stage,
        };
        let contact = match (req.contact_id, req.contact) {
            (Some(id), None) => {
                self.store
                    .update_contact(
                        id,
                        ContactPatch {
                            status: Some(stage.name.clone()),
                            ..Default::default()
                        },
                    )
                    .await?
            }
            (None, Some(fields)) => {
                if fields.name.trim().is_empty() {
                    return Err(CrmError::Validation("contact name is required".into()));
                }
                let now = Utc::now();
                self.store
                    .insert_contact(Contact {
                        id: Uuid::new_v4(),
                        name: fields.name,
                        email: fields.email,
                        phone: fields.phone,
                        status: stage.name.clone(),
                        notes: None,
                        program_id: None,
                        recruiter_id: req.recruiter_id,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?
            }
            _ => {
                return Err(CrmError::Validation(
                    "exactly one of contact_id or contact is required".into(),
                ))
            }
        };
        let now = Utc::now();
        let deal = Deal {
            id: Uuid::new_v4(),
            pipeline_id,
            stage_id: stage.id,
            contact_id: contact.id,
            recruiter_id: req.recruiter_id,
            value: req.value,
            contact_snapshot: ContactSnapshot::of(&contact),
            won: None,
            last_activity_at: now,
            created_at: now,
            updated_at: now,
        };
        info!(contact = %contact.name, stage = %stage.name, "creating deal");
        self.store.insert_deal(deal).await
    }

    /// Marks a deal won or lost; the deal keeps its row but no longer
    /// counts as open.
    pub async fn close_deal(&self, deal_id: Uuid, won: bool) -> Result<Deal, CrmError> {
        let mut deal = self.store.get_deal(deal_id).await?;
        if deal.won.is_some() {
            return Err(CrmError::Conflict("deal already closed".into()));
        }
        let now = Utc::now();
        deal.won = Some(won);
        deal.last_activity_at = now;
        deal.updated_at = now;
        self.store.update_deal(deal).await
    }

    pub async fn board(&self, pipeline_id: Uuid) -> Result<BoardView, CrmError> {
        self.store.get_pipeline(pipeline_id).await?;
        let stages = self.store.list_stages(pipeline_id).await?;
        let mut columns = Vec::with_capacity(stages.len());
        for stage in stages {
            let deals = self.store.list_deals_by_stage(stage.id).await?;
            columns.push(BoardColumn { stage, deals });
        }
        Ok(BoardView {
            pipeline_id,
            columns,
        })
    }
}
