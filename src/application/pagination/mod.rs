use uuid::Uuid;

use crate::application::ordering::sort_items;
use crate::application::ports::session_store::{CursorScope, SessionStore};
use crate::domain::items::{Item, ItemKey};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    pub items: Vec<Item>,
    pub page: u32,
    pub is_first_page: bool,
    // A short slice means we ran out; a page that exactly fills the size is
    // reported as non-last until the following empty page is requested.
    pub is_last_page: bool,
}

/// Result of a cursor move. Running past either end is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Page(PageWindow),
    Terminal {
        message: &'static str,
        page: u32,
        is_first_page: bool,
        is_last_page: bool,
    },
}

pub const NO_MORE_ITEMS: &str = "No more items available";
pub const ALREADY_FIRST_PAGE: &str = "Already on the first page";

/// Slice `[(page-1)*size, page*size)` of an ordered sequence. Page 0 is read as 1.
pub fn window(items: &[Item], page: u32, size: usize) -> PageWindow {
    let page = page.max(1);
    let size = size.max(1);
    let start = (page as usize - 1).saturating_mul(size);
    let slice: Vec<Item> = items.iter().skip(start).take(size).cloned().collect();
    let is_last_page = slice.len() < size;
    PageWindow {
        items: slice,
        page,
        is_first_page: page == 1,
        is_last_page,
    }
}

/// Ordered item list cached next to a cursor.
///
/// Every mutation goes through one of the explicit methods below so the list
/// stays sorted; nothing else touches the inner vector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemSnapshot {
    items: Vec<Item>,
}

impl ItemSnapshot {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: sort_items(items),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn insert(&mut self, item: Item) {
        let key = item.key();
        self.items.retain(|i| i.key() != key);
        self.items.push(item);
        self.resort();
    }

    pub fn evict(&mut self, keys: &[ItemKey]) {
        self.items.retain(|i| !keys.contains(&i.key()));
    }

    /// Mirrors a move: new container, position cleared.
    pub fn relocate(&mut self, key: ItemKey, parent_id: Option<i64>) {
        if let Some(item) = self.items.iter_mut().find(|i| i.key() == key) {
            item.set_parent_id(parent_id);
            item.set_position(None);
        }
        self.resort();
    }

    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = sort_items(items);
    }

    fn resort(&mut self) {
        let items = std::mem::take(&mut self.items);
        self.items = sort_items(items);
    }
}

/// Applies `f` to the snapshot cached for `scope`, if any. Cache upkeep never
/// fails the mutation that triggered it; errors are only logged.
pub async fn update_snapshot<S, F>(sessions: &S, session: Uuid, scope: CursorScope, f: F)
where
    S: SessionStore + ?Sized,
    F: FnOnce(&mut ItemSnapshot),
{
    let state = match sessions.load_cursor(session, scope).await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = ?e, "session_cursor_load_failed");
            return;
        }
    };
    let Some(mut state) = state else {
        return;
    };
    let Some(snapshot) = state.snapshot.as_mut() else {
        return;
    };
    f(snapshot);
    if let Err(e) = sessions.save_cursor(session, scope, state).await {
        tracing::warn!(error = ?e, "session_cursor_save_failed");
    }
}
