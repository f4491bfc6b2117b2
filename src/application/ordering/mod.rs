use std::cmp::Ordering;

use crate::domain::items::{Folder, Item, Link};

// Ordered items come first, by position; unordered items follow in creation
// order. Equal positions fall back to creation time, then id, then kind.
pub fn compare_items(a: &Item, b: &Item) -> Ordering {
    let by_position = match (a.position(), b.position()) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (None, None) => Ordering::Equal,
    };
    by_position
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.id().cmp(&b.id()))
        .then_with(|| a.kind().cmp(&b.kind()))
}

pub fn sort_items(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(compare_items);
    items
}

/// Merges both kinds into one ordered sequence.
pub fn merge(links: Vec<Link>, folders: Vec<Folder>) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::with_capacity(links.len() + folders.len());
    items.extend(links.into_iter().map(Item::Link));
    items.extend(folders.into_iter().map(Item::Folder));
    sort_items(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::items::ItemKey;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn link(id: i64, position: Option<i32>, created: i64) -> Item {
        Item::Link(raw_link(id, position, created))
    }

    fn folder(id: i64, position: Option<i32>, created: i64) -> Item {
        Item::Folder(raw_folder(id, position, created))
    }

    fn raw_link(id: i64, position: Option<i32>, created: i64) -> Link {
        Link {
            id,
            owner_id: 1,
            title: format!("link {id}"),
            description: None,
            url: format!("https://example.com/{id}"),
            folder_id: None,
            position,
            created_at: ts(created),
            updated_at: ts(created),
        }
    }

    fn raw_folder(id: i64, position: Option<i32>, created: i64) -> Folder {
        Folder {
            id,
            owner_id: 1,
            title: format!("folder {id}"),
            parent_id: None,
            position,
            created_at: ts(created),
            updated_at: ts(created),
        }
    }

    fn keys(items: &[Item]) -> Vec<ItemKey> {
        items.iter().map(Item::key).collect()
    }

    #[test]
    fn unordered_item_sorts_after_positioned_one() {
        let a = link(1, None, 1);
        let b = folder(2, Some(5), 2);
        let sorted = sort_items(vec![a, b]);
        assert_eq!(keys(&sorted), vec![ItemKey::folder(2), ItemKey::link(1)]);
    }

    #[test]
    fn equal_positions_fall_back_to_creation_time() {
        let sorted = sort_items(vec![link(1, Some(3), 20), folder(7, Some(3), 10)]);
        assert_eq!(keys(&sorted), vec![ItemKey::folder(7), ItemKey::link(1)]);
    }

    #[test]
    fn unordered_items_keep_creation_order() {
        let sorted = sort_items(vec![link(3, None, 30), link(1, None, 10), folder(2, None, 20)]);
        assert_eq!(
            keys(&sorted),
            vec![ItemKey::link(1), ItemKey::folder(2), ItemKey::link(3)]
        );
    }

    #[test]
    fn identical_timestamps_break_on_id_then_kind() {
        let sorted = sort_items(vec![
            folder(4, Some(1), 0),
            link(4, Some(1), 0),
            link(2, Some(1), 0),
        ]);
        assert_eq!(
            keys(&sorted),
            vec![ItemKey::link(2), ItemKey::link(4), ItemKey::folder(4)]
        );
    }

    #[test]
    fn merge_interleaves_links_and_folders() {
        let links = vec![raw_link(1, Some(2), 0), raw_link(2, None, 0)];
        let folders = vec![raw_folder(1, Some(1), 0)];
        let merged = merge(links, folders);
        assert_eq!(
            keys(&merged),
            vec![ItemKey::folder(1), ItemKey::link(1), ItemKey::link(2)]
        );
    }

    fn arb_item() -> impl Strategy<Value = Item> {
        (
            any::<bool>(),
            1i64..40,
            proptest::option::of(-5i32..5),
            0i64..6,
        )
            .prop_map(|(is_link, id, position, created)| {
                if is_link {
                    link(id, position, created)
                } else {
                    folder(id, position, created)
                }
            })
    }

    proptest! {
        #[test]
        fn sorting_is_idempotent(items in proptest::collection::vec(arb_item(), 0..30)) {
            let once = sort_items(items);
            let twice = sort_items(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn positioned_items_precede_unordered(items in proptest::collection::vec(arb_item(), 0..30)) {
            let sorted = sort_items(items);
            let first_null = sorted.iter().position(|i| i.position().is_none()).unwrap_or(sorted.len());
            prop_assert!(sorted[first_null..].iter().all(|i| i.position().is_none()));
        }

        #[test]
        fn order_does_not_depend_on_input_order(items in proptest::collection::vec(arb_item(), 0..20)) {
            let mut reversed = items.clone();
            reversed.reverse();
            prop_assert_eq!(keys(&sort_items(items)), keys(&sort_items(reversed)));
        }
    }
}
