use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Link,
    Folder,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Link => "link",
            ItemKind::Folder => "folder",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "link" => Some(ItemKind::Link),
            "folder" => Some(ItemKind::Folder),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Links and folders have independent id sequences, so an item is only
/// identified by its kind together with its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub kind: ItemKind,
    pub id: i64,
}

impl ItemKey {
    pub fn link(id: i64) -> Self {
        Self {
            kind: ItemKind::Link,
            id,
        }
    }

    pub fn folder(id: i64) -> Self {
        Self {
            kind: ItemKind::Folder,
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub folder_id: Option<i64>,
    pub position: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub parent_id: Option<i64>,
    pub position: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Link(Link),
    Folder(Folder),
}

impl Item {
    pub fn key(&self) -> ItemKey {
        ItemKey {
            kind: self.kind(),
            id: self.id(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Link(_) => ItemKind::Link,
            Item::Folder(_) => ItemKind::Folder,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Item::Link(l) => l.id,
            Item::Folder(f) => f.id,
        }
    }

    pub fn owner_id(&self) -> i64 {
        match self {
            Item::Link(l) => l.owner_id,
            Item::Folder(f) => f.owner_id,
        }
    }

    pub fn position(&self) -> Option<i32> {
        match self {
            Item::Link(l) => l.position,
            Item::Folder(f) => f.position,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Item::Link(l) => l.created_at,
            Item::Folder(f) => f.created_at,
        }
    }

    /// Containing folder: `folder_id` for links, `parent_id` for folders.
    pub fn parent_id(&self) -> Option<i64> {
        match self {
            Item::Link(l) => l.folder_id,
            Item::Folder(f) => f.parent_id,
        }
    }

    pub fn set_position(&mut self, position: Option<i32>) {
        match self {
            Item::Link(l) => l.position = position,
            Item::Folder(f) => f.position = position,
        }
    }

    pub fn set_parent_id(&mut self, parent_id: Option<i64>) {
        match self {
            Item::Link(l) => l.folder_id = parent_id,
            Item::Folder(f) => f.parent_id = parent_id,
        }
    }
}

impl From<Link> for Item {
    fn from(l: Link) -> Self {
        Item::Link(l)
    }
}

impl From<Folder> for Item {
    fn from(f: Folder) -> Self {
        Item::Folder(f)
    }
}

/// Parent filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentScope {
    /// Every item of the owner regardless of its container.
    Any,
    /// Only items at the root level.
    Root,
    /// Only direct children of the folder.
    In(i64),
}

impl ParentScope {
    pub fn from_parent(parent_id: Option<i64>) -> Self {
        match parent_id {
            Some(id) => ParentScope::In(id),
            None => ParentScope::Root,
        }
    }

    pub fn matches(&self, parent_id: Option<i64>) -> bool {
        match self {
            ParentScope::Any => true,
            ParentScope::Root => parent_id.is_none(),
            ParentScope::In(id) => parent_id == Some(*id),
        }
    }
}
