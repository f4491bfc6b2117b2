//! In-memory stand-ins for the repository ports, used by unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::application::ports::folder_repository::{FolderChanges, FolderRepository, NewFolder};
use crate::application::ports::item_position_repository::{
    ItemPositionRepository, PositionUpdate,
};
use crate::application::ports::link_repository::{LinkChanges, LinkRepository, NewLink};
use crate::application::ports::user_repository::{ProfileChanges, UserRepository, UserRow};
use crate::domain::items::{Folder, Item, ItemKey, ItemKind, Link, ParentScope};
use crate::domain::users::User;

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn link_at(id: i64, owner_id: i64, position: Option<i32>, created: i64) -> Item {
    Item::Link(Link {
        id,
        owner_id,
        title: format!("link {id}"),
        description: None,
        url: format!("https://example.com/{id}"),
        folder_id: None,
        position,
        created_at: ts(created),
        updated_at: ts(created),
    })
}

pub fn folder_at(id: i64, owner_id: i64, position: Option<i32>, created: i64) -> Item {
    Item::Folder(Folder {
        id,
        owner_id,
        title: format!("folder {id}"),
        parent_id: None,
        position,
        created_at: ts(created),
        updated_at: ts(created),
    })
}

#[derive(Default)]
struct State {
    links: BTreeMap<i64, Link>,
    folders: BTreeMap<i64, Folder>,
    users: BTreeMap<i64, (User, String)>,
    next_id: i64,
    clock: i64,
    fail_next_positions: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        ts(self.clock)
    }

    fn descendant_folders(&self, root: i64) -> HashSet<i64> {
        let mut found = HashSet::from([root]);
        loop {
            let before = found.len();
            for f in self.folders.values() {
                if let Some(p) = f.parent_id {
                    if found.contains(&p) {
                        found.insert(f.id);
                    }
                }
            }
            if found.len() == before {
                return found;
            }
        }
    }
}

fn position_key(position: Option<i32>) -> (bool, i32) {
    (position.is_none(), position.unwrap_or_default())
}

/// One shared store behind every port, with cascading folder deletes and a
/// switch that makes the next batch position write fail.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str) -> i64 {
        let mut s = self.state.lock().unwrap();
        let id = s.next_id();
        let created_at = s.tick();
        let user = User {
            id,
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: None,
            last_name: None,
            created_at,
        };
        s.users.insert(id, (user, String::new()));
        id
    }

    pub fn add_link(&self, owner_id: i64, folder_id: Option<i64>, position: Option<i32>) -> Link {
        let mut s = self.state.lock().unwrap();
        let id = s.next_id();
        let now = s.tick();
        let link = Link {
            id,
            owner_id,
            title: format!("link {id}"),
            description: None,
            url: format!("https://example.com/{id}"),
            folder_id,
            position,
            created_at: now,
            updated_at: now,
        };
        s.links.insert(id, link.clone());
        link
    }

    pub fn add_folder(&self, owner_id: i64, parent_id: Option<i64>, position: Option<i32>) -> Folder {
        let mut s = self.state.lock().unwrap();
        let id = s.next_id();
        let now = s.tick();
        let folder = Folder {
            id,
            owner_id,
            title: format!("folder {id}"),
            parent_id,
            position,
            created_at: now,
            updated_at: now,
        };
        s.folders.insert(id, folder.clone());
        folder
    }

    pub fn fail_next_position_batch(&self) {
        self.state.lock().unwrap().fail_next_positions = true;
    }

    pub fn link(&self, id: i64) -> Option<Link> {
        self.state.lock().unwrap().links.get(&id).cloned()
    }

    pub fn folder(&self, id: i64) -> Option<Folder> {
        self.state.lock().unwrap().folders.get(&id).cloned()
    }

    pub fn positions(&self) -> Vec<(ItemKey, Option<i32>)> {
        let s = self.state.lock().unwrap();
        s.links
            .values()
            .map(|l| (ItemKey::link(l.id), l.position))
            .chain(s.folders.values().map(|f| (ItemKey::folder(f.id), f.position)))
            .collect()
    }

    pub fn record_count(&self) -> usize {
        let s = self.state.lock().unwrap();
        s.links.len() + s.folders.len()
    }

    pub fn set_password_hash(&self, user_id: i64, hash: &str) {
        let mut s = self.state.lock().unwrap();
        if let Some(entry) = s.users.get_mut(&user_id) {
            entry.1 = hash.to_string();
        }
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn list_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
    ) -> anyhow::Result<Vec<Link>> {
        let s = self.state.lock().unwrap();
        let mut out: Vec<Link> = s
            .links
            .values()
            .filter(|l| l.owner_id == owner_id && scope.matches(l.folder_id))
            .cloned()
            .collect();
        out.sort_by_key(|l| (position_key(l.position), l.created_at, l.id));
        Ok(out)
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Link>> {
        Ok(self.link(id))
    }

    async fn create_for_owner(&self, owner_id: i64, link: &NewLink) -> anyhow::Result<Link> {
        let created = self.add_link(owner_id, link.folder_id, link.position);
        let mut s = self.state.lock().unwrap();
        let stored = s.links.get_mut(&created.id).expect("just inserted");
        stored.title = link.title.clone();
        stored.description = link.description.clone();
        stored.url = link.url.clone();
        Ok(stored.clone())
    }

    async fn update_fields(
        &self,
        id: i64,
        changes: &LinkChanges,
    ) -> anyhow::Result<Option<Link>> {
        let mut s = self.state.lock().unwrap();
        let now = s.tick();
        Ok(s.links.get_mut(&id).map(|l| {
            if let Some(t) = &changes.title {
                l.title = t.clone();
            }
            if let Some(d) = &changes.description {
                l.description = d.clone();
            }
            if let Some(u) = &changes.url {
                l.url = u.clone();
            }
            l.updated_at = now;
            l.clone()
        }))
    }

    async fn set_folder(&self, id: i64, folder_id: Option<i64>) -> anyhow::Result<Option<Link>> {
        let mut s = self.state.lock().unwrap();
        Ok(s.links.get_mut(&id).map(|l| {
            l.folder_id = folder_id;
            l.position = None;
            l.clone()
        }))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.state.lock().unwrap().links.remove(&id).is_some())
    }

    async fn count_owned(&self, owner_id: i64, ids: &[i64]) -> anyhow::Result<usize> {
        let s = self.state.lock().unwrap();
        let distinct: HashSet<&i64> = ids.iter().collect();
        Ok(distinct
            .into_iter()
            .filter(|id| s.links.get(id).is_some_and(|l| l.owner_id == owner_id))
            .count())
    }
}

#[async_trait]
impl FolderRepository for MemoryStore {
    async fn list_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
    ) -> anyhow::Result<Vec<Folder>> {
        let s = self.state.lock().unwrap();
        let mut out: Vec<Folder> = s
            .folders
            .values()
            .filter(|f| f.owner_id == owner_id && scope.matches(f.parent_id))
            .cloned()
            .collect();
        out.sort_by_key(|f| (position_key(f.position), f.created_at, f.id));
        Ok(out)
    }

    async fn list_page_for_owner(
        &self,
        owner_id: i64,
        scope: ParentScope,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Folder>> {
        let all = FolderRepository::list_for_owner(self, owner_id, scope).await?;
        Ok(all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_for_owner(&self, owner_id: i64, scope: ParentScope) -> anyhow::Result<i64> {
        Ok(FolderRepository::list_for_owner(self, owner_id, scope)
            .await?
            .len() as i64)
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Folder>> {
        Ok(self.folder(id))
    }

    async fn get_owned(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<Folder>> {
        Ok(self.folder(id).filter(|f| f.owner_id == owner_id))
    }

    async fn create_for_owner(
        &self,
        owner_id: i64,
        folder: &NewFolder,
    ) -> anyhow::Result<Folder> {
        let created = self.add_folder(owner_id, folder.parent_id, folder.position);
        let mut s = self.state.lock().unwrap();
        let stored = s.folders.get_mut(&created.id).expect("just inserted");
        stored.title = folder.title.clone();
        Ok(stored.clone())
    }

    async fn update_fields(
        &self,
        id: i64,
        changes: &FolderChanges,
    ) -> anyhow::Result<Option<Folder>> {
        let mut s = self.state.lock().unwrap();
        let now = s.tick();
        Ok(s.folders.get_mut(&id).map(|f| {
            if let Some(t) = &changes.title {
                f.title = t.clone();
            }
            f.updated_at = now;
            f.clone()
        }))
    }

    async fn set_parent(&self, id: i64, parent_id: Option<i64>) -> anyhow::Result<Option<Folder>> {
        let mut s = self.state.lock().unwrap();
        Ok(s.folders.get_mut(&id).map(|f| {
            f.parent_id = parent_id;
            f.position = None;
            f.clone()
        }))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut s = self.state.lock().unwrap();
        if !s.folders.contains_key(&id) {
            return Ok(false);
        }
        let doomed = s.descendant_folders(id);
        s.folders.retain(|fid, _| !doomed.contains(fid));
        s.links
            .retain(|_, l| !l.folder_id.is_some_and(|f| doomed.contains(&f)));
        Ok(true)
    }

    async fn count_owned(&self, owner_id: i64, ids: &[i64]) -> anyhow::Result<usize> {
        let s = self.state.lock().unwrap();
        let distinct: HashSet<&i64> = ids.iter().collect();
        Ok(distinct
            .into_iter()
            .filter(|id| s.folders.get(id).is_some_and(|f| f.owner_id == owner_id))
            .count())
    }

    async fn subtree_keys(&self, id: i64) -> anyhow::Result<Vec<ItemKey>> {
        let s = self.state.lock().unwrap();
        if !s.folders.contains_key(&id) {
            return Ok(Vec::new());
        }
        let folders = s.descendant_folders(id);
        let mut keys: Vec<ItemKey> = folders.iter().map(|f| ItemKey::folder(*f)).collect();
        keys.extend(
            s.links
                .values()
                .filter(|l| l.folder_id.is_some_and(|f| folders.contains(&f)))
                .map(|l| ItemKey::link(l.id)),
        );
        Ok(keys)
    }
}

#[async_trait]
impl ItemPositionRepository for MemoryStore {
    async fn apply_positions(&self, updates: &[PositionUpdate]) -> anyhow::Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail_next_positions {
            s.fail_next_positions = false;
            anyhow::bail!("simulated transaction failure");
        }
        let all_present = updates.iter().all(|u| match u.key.kind {
            ItemKind::Link => s.links.contains_key(&u.key.id),
            ItemKind::Folder => s.folders.contains_key(&u.key.id),
        });
        if !all_present {
            anyhow::bail!("record to update not found");
        }
        for u in updates {
            match u.key.kind {
                ItemKind::Link => {
                    if let Some(l) = s.links.get_mut(&u.key.id) {
                        l.position = Some(u.position);
                    }
                }
                ItemKind::Folder => {
                    if let Some(f) = s.folders.get_mut(&u.key.id) {
                        f.position = Some(u.position);
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let id = self.add_user(username);
        let mut s = self.state.lock().unwrap();
        let entry = s.users.get_mut(&id).expect("just inserted");
        entry.0.email = email.to_string();
        entry.1 = password_hash.to_string();
        Ok(entry.0.clone())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let s = self.state.lock().unwrap();
        Ok(s.users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, h)| UserRow {
                user: u.clone(),
                password_hash: Some(h.clone()),
            }))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>> {
        let s = self.state.lock().unwrap();
        Ok(s.users
            .values()
            .find(|(u, _)| u.username == username)
            .map(|(u, h)| UserRow {
                user: u.clone(),
                password_hash: Some(h.clone()),
            }))
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.state.lock().unwrap().users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn update_profile(
        &self,
        id: i64,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let mut s = self.state.lock().unwrap();
        if let Some(email) = &changes.email {
            if s.users.values().any(|(u, _)| u.id != id && &u.email == email) {
                anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
            }
        }
        Ok(s.users.get_mut(&id).map(|(u, _)| {
            if let Some(v) = &changes.first_name {
                u.first_name = Some(v.clone());
            }
            if let Some(v) = &changes.last_name {
                u.last_name = Some(v.clone());
            }
            if let Some(v) = &changes.email {
                u.email = v.clone();
            }
            u.clone()
        }))
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> anyhow::Result<bool> {
        let mut s = self.state.lock().unwrap();
        Ok(match s.users.get_mut(&id) {
            Some(entry) => {
                entry.1 = password_hash.to_string();
                true
            }
            None => false,
        })
    }

    async fn delete_user(&self, id: i64) -> anyhow::Result<bool> {
        let mut s = self.state.lock().unwrap();
        let removed = s.users.remove(&id).is_some();
        s.links.retain(|_, l| l.owner_id != id);
        s.folders.retain(|_, f| f.owner_id != id);
        Ok(removed)
    }
}
