//! In-memory directory
//!
//! Transactions run against a staged overlay on top of the committed state
//! while holding the write lock, so writers are serialized and readers never
//! observe a half-applied operation. On commit the staged nodes and audit
//! rows are mirrored to the audit journal (if any) and then merged.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::errors::{StoreError, StoreResult};
use super::{AuditReader, AuditSink, Directory, DevoteeReader, DevoteeStore, DirectoryTx, DirectoryView};
use crate::hierarchy::{DevoteeId, DevoteeNode, LeadershipRole, RoleChangeHistory};
use crate::observability::{AuditJournal, Event, Logger};

/// Committed directory contents.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirectoryState {
    pub(crate) devotees: BTreeMap<DevoteeId, DevoteeNode>,
    /// Append order, oldest first
    pub(crate) history: Vec<RoleChangeHistory>,
}

impl DevoteeReader for DirectoryState {
    fn find_by_id(&self, id: DevoteeId) -> StoreResult<Option<DevoteeNode>> {
        Ok(self.devotees.get(&id).cloned())
    }

    fn find_direct_subordinates(&self, id: DevoteeId) -> StoreResult<Vec<DevoteeNode>> {
        Ok(self
            .devotees
            .values()
            .filter(|n| n.reporting_to == Some(id))
            .cloned()
            .collect())
    }

    fn find_by_role(&self, role: LeadershipRole) -> StoreResult<Vec<DevoteeNode>> {
        Ok(self
            .devotees
            .values()
            .filter(|n| n.role == Some(role))
            .cloned()
            .collect())
    }

    fn find_all(&self) -> StoreResult<Vec<DevoteeNode>> {
        Ok(self.devotees.values().cloned().collect())
    }
}

impl AuditReader for DirectoryState {
    fn history_for(&self, devotee_id: DevoteeId) -> StoreResult<Vec<RoleChangeHistory>> {
        Ok(self
            .history
            .iter()
            .rev()
            .filter(|r| r.devotee_id() == devotee_id)
            .cloned()
            .collect())
    }
}

/// Uncommitted writes layered over the committed state.
struct MemoryTx<'a> {
    base: &'a DirectoryState,
    staged: BTreeMap<DevoteeId, DevoteeNode>,
    appended: Vec<RoleChangeHistory>,
}

impl<'a> MemoryTx<'a> {
    fn new(base: &'a DirectoryState) -> Self {
        Self {
            base,
            staged: BTreeMap::new(),
            appended: Vec::new(),
        }
    }

    /// Current view of every node, ordered by id.
    fn nodes(&self) -> impl Iterator<Item = &DevoteeNode> + '_ {
        let mut merged: BTreeMap<DevoteeId, &DevoteeNode> =
            self.base.devotees.iter().map(|(id, n)| (*id, n)).collect();
        merged.extend(self.staged.iter().map(|(id, n)| (*id, n)));
        merged.into_values()
    }
}

impl DevoteeReader for MemoryTx<'_> {
    fn find_by_id(&self, id: DevoteeId) -> StoreResult<Option<DevoteeNode>> {
        Ok(self
            .staged
            .get(&id)
            .or_else(|| self.base.devotees.get(&id))
            .cloned())
    }

    fn find_direct_subordinates(&self, id: DevoteeId) -> StoreResult<Vec<DevoteeNode>> {
        Ok(self
            .nodes()
            .filter(|n| n.reporting_to == Some(id))
            .cloned()
            .collect())
    }

    fn find_by_role(&self, role: LeadershipRole) -> StoreResult<Vec<DevoteeNode>> {
        Ok(self.nodes().filter(|n| n.role == Some(role)).cloned().collect())
    }

    fn find_all(&self) -> StoreResult<Vec<DevoteeNode>> {
        Ok(self.nodes().cloned().collect())
    }
}

impl DevoteeStore for MemoryTx<'_> {
    fn save(&mut self, node: &DevoteeNode) -> StoreResult<()> {
        self.staged.insert(node.id, node.clone());
        Ok(())
    }
}

impl AuditSink for MemoryTx<'_> {
    fn append(&mut self, record: RoleChangeHistory) -> StoreResult<()> {
        self.appended.push(record);
        Ok(())
    }
}

impl AuditReader for MemoryTx<'_> {
    fn history_for(&self, devotee_id: DevoteeId) -> StoreResult<Vec<RoleChangeHistory>> {
        Ok(self
            .base
            .history
            .iter()
            .chain(self.appended.iter())
            .rev()
            .filter(|r| r.devotee_id() == devotee_id)
            .cloned()
            .collect())
    }
}

/// Thread-safe in-memory directory.
pub struct MemoryDirectory {
    state: RwLock<DirectoryState>,
    journal: Option<Arc<dyn AuditJournal>>,
}

impl MemoryDirectory {
    /// Create an empty directory without a journal.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState::default()),
            journal: None,
        }
    }

    /// Create an empty directory that mirrors committed audit rows to `journal`.
    pub fn with_journal(journal: Arc<dyn AuditJournal>) -> Self {
        Self {
            state: RwLock::new(DirectoryState::default()),
            journal: Some(journal),
        }
    }

    pub(crate) fn from_state(state: DirectoryState, journal: Option<Arc<dyn AuditJournal>>) -> Self {
        Self {
            state: RwLock::new(state),
            journal,
        }
    }

    /// Load a node as-is, outside any transaction.
    ///
    /// This is the bulk-import path; it does not check hierarchy rules.
    /// `DirectorySeed` validates the whole forest before importing through it.
    pub fn import(&self, node: DevoteeNode) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        if state.devotees.contains_key(&node.id) {
            return Err(StoreError::DuplicateId(node.id));
        }
        state.devotees.insert(node.id, node);
        Ok(())
    }

    /// Number of devotee nodes.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.devotees.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of committed audit rows.
    pub fn history_len(&self) -> usize {
        self.state.read().map(|s| s.history.len()).unwrap_or(0)
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory for MemoryDirectory {
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn DirectoryView) -> Result<T, E>,
        E: From<StoreError>,
    {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        work(&*state)
    }

    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn DirectoryTx) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut tx = MemoryTx::new(&state);
        let output = work(&mut tx)?;
        let MemoryTx { staged, appended, .. } = tx;

        if let Some(journal) = &self.journal {
            if let Err(e) = journal.append_batch(&appended) {
                let error = e.to_string();
                let records = appended.len().to_string();
                Logger::error(
                    Event::JournalAppendFailed.as_str(),
                    &[("error", error.as_str()), ("records", records.as_str())],
                );
                return Err(StoreError::Journal(e.to_string()).into());
            }
        }

        state.devotees.extend(staged);
        state.history.extend(appended);
        Ok(output)
    }
}
