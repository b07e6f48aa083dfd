mod handlers;
mod service;
mod types;

pub use handlers::*;
pub use service::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::CrmError;
    use crate::shared::models::{Deal, Pipeline, Stage};
    use crate::store::{CrmStore, MemoryStore};
    use std::sync::Arc;
    use uuid::Uuid;

    fn setup() -> (PipelineService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (PipelineService::new(store.clone()), store)
    }

    async fn pipeline_with_stages(
        service: &PipelineService,
        names: &[&str],
    ) -> (Pipeline, Vec<Stage>) {
        let pipeline = service
            .create_pipeline(CreatePipelineRequest {
                name: "US College Recruitment".into(),
            })
            .await
            .unwrap();
        let mut stages = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let stage = service
                .create_stage(
                    pipeline.id,
                    CreateStageRequest {
                        name: name.to_string(),
                        color: None,
                        order: (i + 1) as i32,
                    },
                )
                .await
                .unwrap();
            stages.push(stage);
        }
        (pipeline, stages)
    }

    async fn deal_for(
        service: &PipelineService,
        pipeline_id: Uuid,
        stage_id: Option<Uuid>,
        name: &str,
    ) -> Deal {
        service
            .create_deal(
                pipeline_id,
                CreateDealRequest {
                    contact_id: None,
                    contact: Some(NewContactFields {
                        name: name.into(),
                        email: None,
                        phone: None,
                    }),
                    stage_id,
                    recruiter_id: None,
                    value: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_stage_shifts_colliding_orders() {
        let (service, store) = setup();
        let (pipeline, _) =
            pipeline_with_stages(&service, &["Initial Lead", "Applied", "Signed"]).await;
        service
            .create_stage(
                pipeline.id,
                CreateStageRequest {
                    name: "Interview".into(),
                    color: Some("#2d6cdf".into()),
                    order: 2,
                },
            )
            .await
            .unwrap();

        let stages = store.list_stages(pipeline.id).await.unwrap();
        let orders: Vec<(String, i32)> = stages
            .iter()
            .map(|s| (s.name.clone(), s.stage_order))
            .collect();
        assert_eq!(
            orders,
            vec![
                ("Initial Lead".to_string(), 1),
                ("Interview".to_string(), 2),
                ("Applied".to_string(), 3),
                ("Signed".to_string(), 4),
            ]
        );
    }

    #[tokio::test]
    async fn create_stage_without_collision_keeps_orders() {
        let (service, store) = setup();
        let (pipeline, _) = pipeline_with_stages(&service, &["Initial Lead"]).await;
        service
            .create_stage(
                pipeline.id,
                CreateStageRequest {
                    name: "Applied".into(),
                    color: None,
                    order: 5,
                },
            )
            .await
            .unwrap();
        let stages = store.list_stages(pipeline.id).await.unwrap();
        assert_eq!(stages[0].stage_order, 1);
        assert_eq!(stages[1].stage_order, 5);
    }

    #[tokio::test]
    async fn reorder_stage_shifts_intervening_stages() {
        let (service, store) = setup();
        let (pipeline, stages) = pipeline_with_stages(&service, &["A", "B", "C", "D"]).await;
        // Move A (order 1) to order 3: B and C shift down.
        service.reorder_stage(stages[0].id, 3).await.unwrap();
        let by_order = store.list_stages(pipeline.id).await.unwrap();
        let names: Vec<&str> = by_order.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A", "D"]);
        let orders: Vec<i32> = by_order.iter().map(|s| s.stage_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn reorder_unknown_stage_is_not_found() {
        let (service, _) = setup();
        let err = service.reorder_stage(Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, CrmError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_stage_with_deals_requires_target() {
        let (service, store) = setup();
        let (pipeline, stages) = pipeline_with_stages(&service, &["Dormant Lead", "Follow Up"]).await;
        let deal = deal_for(&service, pipeline.id, Some(stages[0].id), "Maribel Santos").await;

        let err = service.delete_stage(stages[0].id, None).await.unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref msg) if msg == "deals present, target required"));

        // Stage and deal untouched.
        assert!(store.get_stage(stages[0].id).await.is_ok());
        let unchanged = store.get_deal(deal.id).await.unwrap();
        assert_eq!(unchanged.stage_id, stages[0].id);
    }

    #[tokio::test]
    async fn delete_stage_rejects_target_from_other_pipeline() {
        let (service, _) = setup();
        let (pipeline, stages) = pipeline_with_stages(&service, &["Dormant Lead"]).await;
        deal_for(&service, pipeline.id, None, "Kwame Asante").await;
        let (_, other_stages) = pipeline_with_stages(&service, &["Elsewhere"]).await;

        let err = service
            .delete_stage(stages[0].id, Some(other_stages[0].id))
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref msg) if msg == "target must belong to same pipeline"));
    }

    #[tokio::test]
    async fn delete_stage_reassigns_all_deals_to_target() {
        let (service, store) = setup();
        let (pipeline, stages) =
            pipeline_with_stages(&service, &["Dormant Lead", "Follow Up", "Signed"]).await;
        let d1 = deal_for(&service, pipeline.id, Some(stages[0].id), "Lead One").await;
        let d2 = deal_for(&service, pipeline.id, Some(stages[0].id), "Lead Two").await;
        let other = deal_for(&service, pipeline.id, Some(stages[2].id), "Lead Three").await;

        service
            .delete_stage(stages[0].id, Some(stages[1].id))
            .await
            .unwrap();

        assert!(matches!(
            store.get_stage(stages[0].id).await,
            Err(CrmError::NotFound(_))
        ));
        assert_eq!(store.get_deal(d1.id).await.unwrap().stage_id, stages[1].id);
        assert_eq!(store.get_deal(d2.id).await.unwrap().stage_id, stages[1].id);
        // Deals in other stages are untouched.
        assert_eq!(
            store.get_deal(other.id).await.unwrap().stage_id,
            stages[2].id
        );
    }

    #[tokio::test]
    async fn delete_empty_stage_needs_no_target() {
        let (service, store) = setup();
        let (_, stages) = pipeline_with_stages(&service, &["Ghost Stage"]).await;
        service.delete_stage(stages[0].id, None).await.unwrap();
        assert!(store.get_stage(stages[0].id).await.is_err());
    }

    #[tokio::test]
    async fn move_deal_to_foreign_stage_is_conflict() {
        let (service, store) = setup();
        let (pipeline, _) = pipeline_with_stages(&service, &["Initial Lead"]).await;
        let deal = deal_for(&service, pipeline.id, None, "Maribel Santos").await;
        let (_, foreign) = pipeline_with_stages(&service, &["Other Stage"]).await;

        let err = service
            .move_deal(deal.id, foreign[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::Conflict(_)));
        assert_eq!(store.get_deal(deal.id).await.unwrap().stage_id, deal.stage_id);
    }

    #[tokio::test]
    async fn move_deal_updates_stage_and_contact_status() {
        let (service, store) = setup();
        let (pipeline, stages) = pipeline_with_stages(&service, &["Initial Lead", "Applied"]).await;
        let deal = deal_for(&service, pipeline.id, None, "Maribel Santos").await;

        let moved = service.move_deal(deal.id, stages[1].id).await.unwrap();
        assert_eq!(moved.stage_id, stages[1].id);
        assert!(moved.last_activity_at >= deal.last_activity_at);

        let contact = store.get_contact(deal.contact_id).await.unwrap();
        assert_eq!(contact.status, "Applied");
    }

    #[tokio::test]
    async fn create_deal_defaults_to_lowest_order_stage() {
        let (service, _) = setup();
        let (pipeline, stages) = pipeline_with_stages(&service, &["Initial Lead", "Applied"]).await;
        let deal = deal_for(&service, pipeline.id, None, "Kwame Asante").await;
        assert_eq!(deal.stage_id, stages[0].id);
        assert_eq!(deal.contact_snapshot.name, "Kwame Asante");
    }

    #[tokio::test]
    async fn create_deal_in_empty_pipeline_is_rejected() {
        let (service, _) = setup();
        let pipeline = service
            .create_pipeline(CreatePipelineRequest {
                name: "Empty".into(),
            })
            .await
            .unwrap();
        let err = service
            .create_deal(
                pipeline.id,
                CreateDealRequest {
                    contact_id: None,
                    contact: Some(NewContactFields {
                        name: "Nobody".into(),
                        email: None,
                        phone: None,
                    }),
                    stage_id: None,
                    recruiter_id: None,
                    value: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref msg) if msg == "pipeline has no stages"));
    }

    #[tokio::test]
    async fn create_deal_requires_exactly_one_contact_source() {
        let (service, store) = setup();
        let (pipeline, _) = pipeline_with_stages(&service, &["Initial Lead"]).await;
        let err = service
            .create_deal(
                pipeline.id,
                CreateDealRequest {
                    contact_id: None,
                    contact: None,
                    stage_id: None,
                    recruiter_id: None,
                    value: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation(_)));
        assert!(store
            .list_deals_by_pipeline(pipeline.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn bulk_move_is_idempotent() {
        let (service, _) = setup();
        let (pipeline, stages) = pipeline_with_stages(&service, &["From", "To"]).await;
        deal_for(&service, pipeline.id, Some(stages[0].id), "Lead One").await;
        deal_for(&service, pipeline.id, Some(stages[0].id), "Lead Two").await;

        let first = service
            .bulk_move_deals(stages[0].id, stages[1].id)
            .await
            .unwrap();
        assert_eq!(first.moved, 2);
        let second = service
            .bulk_move_deals(stages[0].id, stages[1].id)
            .await
            .unwrap();
        assert_eq!(second.moved, 0);
    }

    #[tokio::test]
    async fn close_deal_twice_is_conflict() {
        let (service, _) = setup();
        let (pipeline, _) = pipeline_with_stages(&service, &["Initial Lead"]).await;
        let deal = deal_for(&service, pipeline.id, None, "Maribel Santos").await;
        let closed = service.close_deal(deal.id, true).await.unwrap();
        assert_eq!(closed.won, Some(true));
        let err = service.close_deal(deal.id, false).await.unwrap_err();
        assert!(matches!(err, CrmError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_pipeline_with_open_deals_is_conflict() {
        let (service, store) = setup();
        let (pipeline, _) = pipeline_with_stages(&service, &["Initial Lead"]).await;
        let deal = deal_for(&service, pipeline.id, None, "Maribel Santos").await;

        let err = service.delete_pipeline(pipeline.id).await.unwrap_err();
        assert!(matches!(err, CrmError::Conflict(_)));

        service.close_deal(deal.id, false).await.unwrap();
        service.delete_pipeline(pipeline.id).await.unwrap();
        assert!(store.get_pipeline(pipeline.id).await.is_err());
        assert!(store.get_deal(deal.id).await.is_err());
    }
}
