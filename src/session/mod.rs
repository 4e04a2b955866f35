//! Session state of the signed-in user.
//!
//! Holds the user's privileges and their curated groups. Every mutation of
//! the group list is announced on a broadcast channel so views can refresh.

use tokio::sync::broadcast;

use crate::auth::UserPrivileges;
use crate::models::{CuratedGroup, CurrentUser};

const EVENT_CAPACITY: usize = 32;

/// Change notifications emitted by a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MyCuratedGroupsUpdated,
}

/// Signed-in user plus the cached list of their curated groups.
#[derive(Debug)]
pub struct Session {
    uid: String,
    privileges: UserPrivileges,
    my_curated_groups: Vec<CuratedGroup>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(uid: impl Into<String>, privileges: UserPrivileges) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            uid: uid.into(),
            privileges,
            my_curated_groups: Vec::new(),
            events,
        }
    }

    pub fn from_current_user(user: CurrentUser) -> Self {
        let privileges = UserPrivileges::from_current_user(&user);
        let mut session = Self::new(user.uid, privileges);
        session.my_curated_groups = user.my_curated_groups;
        session
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn privileges(&self) -> &UserPrivileges {
        &self.privileges
    }

    pub fn my_curated_groups(&self) -> &[CuratedGroup] {
        &self.my_curated_groups
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Record a newly created group.
    pub fn on_create(&mut self, group: CuratedGroup) -> &[CuratedGroup] {
        tracing::debug!("Caching new curated group {}", group.id);
        self.my_curated_groups.push(group);
        self.notify();
        &self.my_curated_groups
    }

    /// Forget a deleted group. An unknown id changes nothing and emits nothing.
    pub fn on_delete(&mut self, group_id: i64) -> &[CuratedGroup] {
        match self.my_curated_groups.iter().position(|g| g.id == group_id) {
            Some(index) => {
                self.my_curated_groups.remove(index);
                self.notify();
            }
            None => tracing::warn!("Deleted curated group {} was not cached", group_id),
        }
        &self.my_curated_groups
    }

    /// Merge an updated group into its cached copy.
    pub fn on_update(&mut self, group: CuratedGroup) -> &[CuratedGroup] {
        match self.my_curated_groups.iter_mut().find(|g| g.id == group.id) {
            Some(cached) => {
                cached.merge_from(group);
                self.notify();
            }
            None => tracing::warn!("Updated curated group {} was not cached", group.id),
        }
        &self.my_curated_groups
    }

    fn notify(&self) {
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::MyCuratedGroupsUpdated);
    }
}
