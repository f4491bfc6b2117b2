use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::hierarchy;
use crate::application::pagination::update_snapshot;
use crate::application::ports::link_repository::{LinkChanges, LinkRepository};
use crate::application::ports::session_store::{CursorScope, SessionStore};
use crate::domain::items::{Item, Link};

/// Field-level edit of an owned link. Containment and position are not touched here.
pub struct UpdateLink<'a, L, S>
where
    L: LinkRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub links: &'a L,
    pub sessions: &'a S,
}

impl<'a, L, S> UpdateLink<'a, L, S>
where
    L: LinkRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn execute(
        &self,
        session: Uuid,
        owner_id: i64,
        id: i64,
        changes: &LinkChanges,
    ) -> Result<Link, ItemError> {
        hierarchy::require_owned_link(self.links, owner_id, id).await?;
        let updated = self
            .links
            .update_fields(id, changes)
            .await?
            .ok_or(ItemError::NotAuthorized("Access to resource denied"))?;
        let cached = Item::Link(updated.clone());
        update_snapshot(self.sessions, session, CursorScope::Own(owner_id), |snap| {
            snap.insert(cached)
        })
        .await;
        Ok(updated)
    }
}
