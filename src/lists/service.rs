use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::{Contact, ContactList, ListKind};
use crate::store::{ContactQuery, CrmStore};

/// Computes membership of contact lists. Static lists hold explicit
/// membership rows; smart lists re-evaluate their filter against the
/// contact store on every read and never persist a member set.
pub struct ListService {
    store: Arc<dyn CrmStore>,
}

impl ListService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create_list(&self, req: CreateListRequest) -> Result<ContactList, CrmError> {
        if req.name.trim().is_empty() {
            return Err(CrmError::Validation("list name is required".into()));
        }
        let filter = match req.kind {
            ListKind::Smart => {
                let filter = req.filter.unwrap_or_default();
                if filter.is_empty() {
                    return Err(CrmError::Validation(
                        "smart list requires a non-empty filter".into(),
                    ));
                }
                filter
            }
            ListKind::Static => Vec::new(),
        };
        let now = Utc::now();
        let list = ContactList {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            kind: req.kind,
            filter,
            created_at: now,
            updated_at: now,
        };
        info!(list = %list.name, kind = %list.kind, "creating list");
        self.store.insert_list(list).await
    }

    pub async fn get_list(&self, id: Uuid) -> Result<ListView, CrmError> {
        let list = self.store.get_list(id).await?;
        let contact_count = self.count_members(&list).await?;
        Ok(ListView {
            list,
            contact_count,
        })
    }

    pub async fn list_lists(&self) -> Result<Vec<ListView>, CrmError> {
        let mut views = Vec::new();
        for list in self.store.list_lists().await? {
            let contact_count = self.count_members(&list).await?;
            views.push(ListView {
                list,
                contact_count,
            });
        }
        Ok(views)
    }

    /// Member contact rows: stored rows for static lists, a live filter
    /// evaluation for smart lists.
    pub async fn materialize(&self, id: Uuid) -> Result<Vec<Contact>, CrmError> {
        let list = self.store.get_list(id).await?;
        match list.kind {
            ListKind::Static => {
                let mut contacts = Vec::new();
                for contact_id in self.store.list_members(id).await? {
                    contacts.push(self.store.get_contact(contact_id).await?);
                }
                Ok(contacts)
            }
            ListKind::Smart => {
                let (rows, _) = self
                    .store
                    .find_contacts(ContactQuery {
                        rules: list.filter.clone(),
                        ..Default::default()
                    })
                    .await?;
                Ok(rows)
            }
        }
    }

    /// Static lists only. Every id must exist; unknown ids fail the
    /// whole call, listed in the error. Adding an existing member is a
    /// no-op, so the returned count is only the rows actually inserted.
    pub async fn add_members(
        &self,
        list_id: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<AddMembersResult, CrmError> {
        let list = self.store.get_list(list_id).await?;
        if list.kind == ListKind::Smart {
            return Err(CrmError::Validation(
                "cannot manually add to smart list".into(),
            ));
        }
        let mut missing = Vec::new();
        for contact_id in contact_ids {
            if self.store.get_contact(*contact_id).await.is_err() {
                missing.push(contact_id.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(CrmError::NotFound(format!(
                "unknown contacts: {}",
                missing.join(", ")
            )));
        }
        let mut added = 0;
        for contact_id in contact_ids {
            if self.store.add_member(list_id, *contact_id).await? {
                added += 1;
            }
        }
        Ok(AddMembersResult { added })
    }

    /// Removes matching membership rows. Ids that were never members
    /// simply don't count; 0 removed is not an error.
    pub async fn remove_members(
        &self,
        list_id: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<RemoveMembersResult, CrmError> {
        self.store.get_list(list_id).await?;
        let mut removed = 0;
        for contact_id in contact_ids {
            if self.store.remove_member(list_id, *contact_id).await? {
                removed += 1;
            }
        }
        Ok(RemoveMembersResult { removed })
    }

    /// Membership rows go first, then the list row, so the backing
    /// store never holds membership rows for a missing list.
    pub async fn delete_list(&self, list_id: Uuid) -> Result<(), CrmError> {
        self.store.get_list(list_id).await?;
        self.store.clear_members(list_id).await?;
        self.store.delete_list(list_id).await
    }

    async fn count_members(&self, list: &ContactList) -> Result<usize, CrmError> {
        match list.kind {
            ListKind::Static => Ok(self.store.list_members(list.id).await?.len()),
            ListKind::Smart => {
                let (_, total) = self
                    .store
                    .find_contacts(ContactQuery {
                        rules: list.filter.clone(),
                        limit: Some(0),
                        ..Default::default()
                    })
                    .await?;
                Ok(total)
            }
        }
    }
}
