//! Cycle Guard
//!
//! Decides whether pointing a node at a proposed supervisor would close a
//! loop in the reports-to forest. The walk is iterative and bounded by a
//! visited set, so chains that are already corrupt (contain a loop that does
//! not pass through the node) terminate instead of spinning.

use std::collections::HashSet;

use super::node::DevoteeId;
use crate::observability::{Event, Logger};
use crate::store::{DevoteeReader, StoreResult};

/// Cycle Guard
pub struct CycleGuard;

impl CycleGuard {
    /// Whether making `node_id` report to `proposed_supervisor_id` creates a cycle.
    ///
    /// Walks up from the proposed supervisor. Reaching `node_id` means the
    /// supervisor already sits below the node. A dangling reference ends the
    /// chain like `None` does. A revisited id means the existing data holds a
    /// loop elsewhere; that is logged and reported as "no cycle via this path".
    pub fn would_create_cycle<R: DevoteeReader + ?Sized>(
        store: &R,
        node_id: DevoteeId,
        proposed_supervisor_id: DevoteeId,
    ) -> StoreResult<bool> {
        if node_id == proposed_supervisor_id {
            return Ok(true);
        }

        let mut visited = HashSet::new();
        let mut current = Some(proposed_supervisor_id);

        while let Some(id) = current {
            if id == node_id {
                return Ok(true);
            }
            if !visited.insert(id) {
                let revisited = id.to_string();
                let start = proposed_supervisor_id.to_string();
                Logger::warn(
                    Event::CorruptChainDetected.as_str(),
                    &[("revisited_id", revisited.as_str()), ("walk_start", start.as_str())],
                );
                return Ok(false);
            }
            current = store.find_by_id(id)?.and_then(|n| n.reporting_to);
        }

        Ok(false)
    }

    /// Supervisor chain above `node_id`, nearest first.
    ///
    /// Stops at the top of the tree, at a dangling reference, or at the first
    /// repeated id.
    pub fn reporting_chain<R: DevoteeReader + ?Sized>(
        store: &R,
        node_id: DevoteeId,
    ) -> StoreResult<Vec<DevoteeId>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([node_id]);
        let mut current = store.find_by_id(node_id)?.and_then(|n| n.reporting_to);

        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            chain.push(id);
            current = store.find_by_id(id)?.and_then(|n| n.reporting_to);
        }

        Ok(chain)
    }
}
