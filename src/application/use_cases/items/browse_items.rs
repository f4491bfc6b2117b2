use uuid::Uuid;

use crate::application::errors::ItemError;
use crate::application::pagination::{
    ALREADY_FIRST_PAGE, ItemSnapshot, NO_MORE_ITEMS, PageOutcome, PageWindow, window,
};
use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::session_store::{CursorScope, CursorState, SessionStore};
use crate::application::use_cases::items::list_items::ListItems;
use crate::domain::items::ParentScope;

/// Paged browsing over an owner's merged items with a per-session cursor.
///
/// `page` always re-reads the store and refreshes the cached snapshot.
/// `next` and `previous` move the cursor over the snapshot, loading one first
/// when the session has none yet.
pub struct BrowseItems<'a, L, F, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub links: &'a L,
    pub folders: &'a F,
    pub sessions: &'a S,
    pub page_size: usize,
}

impl<'a, L, F, S> BrowseItems<'a, L, F, S>
where
    L: LinkRepository + ?Sized,
    F: FolderRepository + ?Sized,
    S: SessionStore + ?Sized,
{
    pub async fn page(
        &self,
        session: Uuid,
        scope: CursorScope,
        page: u32,
    ) -> Result<PageWindow, ItemError> {
        let page = page.max(1);
        let snapshot = self.load_snapshot(scope).await?;
        let out = window(snapshot.items(), page, self.page_size);
        self.sessions
            .save_cursor(
                session,
                scope,
                CursorState {
                    page,
                    snapshot: Some(snapshot),
                },
            )
            .await?;
        Ok(out)
    }

    pub async fn next(&self, session: Uuid, scope: CursorScope) -> Result<PageOutcome, ItemError> {
        let (current, snapshot) = self.cursor(session, scope).await?;
        let next = current.saturating_add(1);
        let out = window(snapshot.items(), next, self.page_size);
        if out.items.is_empty() {
            self.store(session, scope, current, snapshot).await?;
            return Ok(PageOutcome::Terminal {
                message: NO_MORE_ITEMS,
                page: current,
                is_first_page: current == 1,
                is_last_page: true,
            });
        }
        self.store(session, scope, next, snapshot).await?;
        Ok(PageOutcome::Page(out))
    }

    pub async fn previous(
        &self,
        session: Uuid,
        scope: CursorScope,
    ) -> Result<PageOutcome, ItemError> {
        let (current, snapshot) = self.cursor(session, scope).await?;
        if current <= 1 {
            let first = window(snapshot.items(), 1, self.page_size);
            self.store(session, scope, 1, snapshot).await?;
            return Ok(PageOutcome::Terminal {
                message: ALREADY_FIRST_PAGE,
                page: 1,
                is_first_page: true,
                is_last_page: first.is_last_page,
            });
        }
        let prev = current - 1;
        let out = window(snapshot.items(), prev, self.page_size);
        self.store(session, scope, prev, snapshot).await?;
        Ok(PageOutcome::Page(out))
    }

    async fn cursor(
        &self,
        session: Uuid,
        scope: CursorScope,
    ) -> Result<(u32, ItemSnapshot), ItemError> {
        let state = self
            .sessions
            .load_cursor(session, scope)
            .await?
            .unwrap_or_default();
        let snapshot = match state.snapshot {
            Some(snapshot) => snapshot,
            None => self.load_snapshot(scope).await?,
        };
        Ok((state.page.max(1), snapshot))
    }

    async fn load_snapshot(&self, scope: CursorScope) -> Result<ItemSnapshot, ItemError> {
        let items = ListItems {
            links: self.links,
            folders: self.folders,
        }
        .execute(scope.owner_id(), ParentScope::Any)
        .await?;
        Ok(ItemSnapshot::new(items))
    }

    async fn store(
        &self,
        session: Uuid,
        scope: CursorScope,
        page: u32,
        snapshot: ItemSnapshot,
    ) -> Result<(), ItemError> {
        self.sessions
            .save_cursor(
                session,
                scope,
                CursorState {
                    page,
                    snapshot: Some(snapshot),
                },
            )
            .await?;
        Ok(())
    }
}
