pub mod folder_repository_sqlx;
pub mod item_position_repository_sqlx;
pub mod link_repository_sqlx;
pub mod user_repository_sqlx;

use crate::domain::items::ParentScope;

// Containment filter appended to an owner-scoped WHERE; `param` is the
// placeholder index the parent id will be bound to.
pub(crate) fn parent_filter(column: &str, scope: ParentScope, param: usize) -> (String, Option<i64>) {
    match scope {
        ParentScope::Any => (String::new(), None),
        ParentScope::Root => (format!(" AND {column} IS NULL"), None),
        ParentScope::In(id) => (format!(" AND {column} = ${param}"), Some(id)),
    }
}

pub(crate) const ITEM_ORDER: &str = "ORDER BY position ASC NULLS LAST, created_at ASC, id ASC";
