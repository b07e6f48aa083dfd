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
    use crate::shared::models::Contact;
    use crate::store::{CrmStore, MemoryStore};
    use chrono::Utc;
    use std::sync::Arc;
    use uuid::Uuid;

    fn setup() -> (GroupService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (GroupService::new(store.clone()), store)
    }

    async fn contact(store: &MemoryStore, name: &str) -> Contact {
        let now = Utc::now();
        store
            .insert_contact(Contact {
                id: Uuid::new_v4(),
                name: name.into(),
                email: None,
                phone: None,
                status: "New".into(),
                notes: None,
                program_id: None,
                recruiter_id: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    async fn group(service: &GroupService, name: &str) -> crate::shared::models::Group {
        service
            .create_group(CreateGroupRequest {
                name: name.into(),
                description: None,
                color: Some("#e0b84c".into()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn add_recomputes_cached_count() {
        let (service, store) = setup();
        let g = group(&service, "U18 Goalkeepers").await;
        let a = contact(&store, "A").await;
        let b = contact(&store, "B").await;

        let result = service.add_to_group(g.id, &[a.id, b.id]).await.unwrap();
        assert_eq!(result.affected, 2);
        assert_eq!(result.player_count, 2);
        assert_eq!(store.get_group(g.id).await.unwrap().player_count, 2);

        // Re-adding is a no-op but the cached count stays right.
        let again = service.add_to_group(g.id, &[a.id]).await.unwrap();
        assert_eq!(again.affected, 0);
        assert_eq!(again.player_count, 2);
    }

    #[tokio::test]
    async fn remove_recomputes_cached_count() {
        let (service, store) = setup();
        let g = group(&service, "U18 Goalkeepers").await;
        let a = contact(&store, "A").await;
        let b = contact(&store, "B").await;
        service.add_to_group(g.id, &[a.id, b.id]).await.unwrap();

        let result = service.remove_from_group(g.id, &[a.id]).await.unwrap();
        assert_eq!(result.affected, 1);
        assert_eq!(result.player_count, 1);
        assert_eq!(store.get_group(g.id).await.unwrap().player_count, 1);
    }

    #[tokio::test]
    async fn unknown_group_is_not_found() {
        let (service, store) = setup();
        let a = contact(&store, "A").await;
        let err = service
            .add_to_group(Uuid::new_v4(), &[a.id])
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_contacts_fail_the_whole_add() {
        let (service, store) = setup();
        let g = group(&service, "U18 Goalkeepers").await;
        let a = contact(&store, "A").await;
        let err = service
            .add_to_group(g.id, &[a.id, Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::NotFound(_)));
        assert_eq!(store.get_group(g.id).await.unwrap().player_count, 0);
    }

    #[tokio::test]
    async fn delete_group_clears_membership_first() {
        let (service, store) = setup();
        let g = group(&service, "U18 Goalkeepers").await;
        let a = contact(&store, "A").await;
        service.add_to_group(g.id, &[a.id]).await.unwrap();

        service.delete_group(g.id).await.unwrap();
        assert!(store.get_group(g.id).await.is_err());
        assert!(store.group_members(g.id).await.unwrap().is_empty());
    }
}
