//! # Directory Store
//!
//! Collaborator interfaces the hierarchy engine persists through, and the
//! in-memory reference implementation.
//!
//! ## Invariants
//! - Every engine write happens inside [`Directory::transaction`]
//! - A transaction that returns an error leaves no trace (node writes and
//!   audit rows are discarded together)
//! - Audit rows are append-only

mod errors;
mod memory;
mod seed;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryDirectory;
pub use seed::DirectorySeed;

use crate::hierarchy::{DevoteeId, DevoteeNode, LeadershipRole, RoleChangeHistory};

/// Read-only access to devotee nodes.
pub trait DevoteeReader {
    fn find_by_id(&self, id: DevoteeId) -> StoreResult<Option<DevoteeNode>>;

    /// Nodes whose `reporting_to` is `id`, ordered by id.
    fn find_direct_subordinates(&self, id: DevoteeId) -> StoreResult<Vec<DevoteeNode>>;

    /// Nodes holding `role`, ordered by id.
    fn find_by_role(&self, role: LeadershipRole) -> StoreResult<Vec<DevoteeNode>>;

    /// Every node, ordered by id.
    fn find_all(&self) -> StoreResult<Vec<DevoteeNode>>;

    fn exists(&self, id: DevoteeId) -> StoreResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

/// Read-only access to the role change history.
pub trait AuditReader {
    /// Records for one devotee, newest first.
    fn history_for(&self, devotee_id: DevoteeId) -> StoreResult<Vec<RoleChangeHistory>>;
}

/// Devotee persistence.
pub trait DevoteeStore: DevoteeReader {
    /// Insert or replace a node.
    fn save(&mut self, node: &DevoteeNode) -> StoreResult<()>;
}

/// Append-only sink for role change history.
pub trait AuditSink {
    fn append(&mut self, record: RoleChangeHistory) -> StoreResult<()>;
}

/// Consistent read view handed to [`Directory::read`].
pub trait DirectoryView: DevoteeReader + AuditReader {}

impl<T: DevoteeReader + AuditReader + ?Sized> DirectoryView for T {}

/// Read-write view handed to [`Directory::transaction`].
pub trait DirectoryTx: DevoteeStore + AuditSink + AuditReader {}

impl<T: DevoteeStore + AuditSink + AuditReader + ?Sized> DirectoryTx for T {}

/// Transactional directory.
///
/// `transaction` commits everything `work` wrote if and only if `work`
/// returns `Ok`. Implementations must isolate concurrent transactions that
/// touch the same nodes; `MemoryDirectory` serializes all writers.
pub trait Directory: Send + Sync {
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn DirectoryView) -> Result<T, E>,
        E: From<StoreError>;

    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn DirectoryTx) -> Result<T, E>,
        E: From<StoreError>;
}
