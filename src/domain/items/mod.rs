pub mod item;

pub use item::{Folder, Item, ItemKey, ItemKind, Link, ParentScope};
