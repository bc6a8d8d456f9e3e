//! Pending Member Registry
//!
//! CRITICAL: All pending state is EPHEMERAL (RAM only, never persisted).
//! An entry exists exactly while a member's consent decision is outstanding
//! and is removed as the terminal step of accept, decline or expiry.
//!
//! Removal is atomic. Whichever transition removes an entry first owns its
//! side effects; every later removal for the same key observes `None`.

use super::timer::{TimerHandle, TimerId};
use crate::gateway::traits::{GroupId, MemberId, MessageId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Registry key: one member in one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingKey {
    pub group_id: GroupId,
    pub member_id: MemberId,
}

impl PendingKey {
    pub fn new(group_id: GroupId, member_id: MemberId) -> Self {
        Self {
            group_id,
            member_id,
        }
    }
}

/// How a pending decision ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Declined,
    Expired,
}

/// Entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Muted, prompt posted, timer running
    Pending,
    /// Removed from the registry by the given transition
    Resolved(Resolution),
}

/// One member awaiting a decision in one group
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub group_id: GroupId,
    pub member_id: MemberId,
    /// Posted consent prompt, deleted on resolution
    pub prompt_message_id: MessageId,
    /// Expiry timer owned by this entry
    pub timer: TimerHandle,
    pub state: EntryState,
}

impl PendingEntry {
    pub fn new(key: PendingKey, prompt_message_id: MessageId, timer: TimerHandle) -> Self {
        Self {
            group_id: key.group_id,
            member_id: key.member_id,
            prompt_message_id,
            timer,
            state: EntryState::Pending,
        }
    }

    pub fn key(&self) -> PendingKey {
        PendingKey::new(self.group_id, self.member_id)
    }

    /// Stamp a removed entry with the transition that removed it
    pub fn resolve(mut self, resolution: Resolution) -> Self {
        self.state = EntryState::Resolved(resolution);
        self
    }
}

/// In-memory registry of pending members
#[derive(Debug, Default)]
pub struct PendingRegistry {
    entries: Mutex<HashMap<PendingKey, PendingEntry>>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PendingKey, PendingEntry>> {
        // The map stays consistent even if a holder panicked
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an entry, returning the one it replaced.
    ///
    /// A replaced entry's timer is canceled before it is returned.
    pub fn insert(&self, entry: PendingEntry) -> Option<PendingEntry> {
        let previous = self.entries().insert(entry.key(), entry);
        if let Some(previous) = &previous {
            previous.timer.cancel();
        }
        previous
    }

    /// Atomically remove and return the entry for `key`
    pub fn remove(&self, key: &PendingKey) -> Option<PendingEntry> {
        self.entries().remove(key)
    }

    /// Atomically remove the entry for `key` only if it is still owned by
    /// `timer`. A timer that outlived its entry can never resolve a successor.
    pub fn remove_if_timer(&self, key: &PendingKey, timer: TimerId) -> Option<PendingEntry> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.timer.id() == timer => entries.remove(key),
            _ => None,
        }
    }

    /// Read-only lookup
    pub fn get(&self, key: &PendingKey) -> Option<PendingEntry> {
        self.entries().get(key).cloned()
    }

    pub fn contains(&self, key: &PendingKey) -> bool {
        self.entries().contains_key(key)
    }

    /// Number of members currently awaiting a decision
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
