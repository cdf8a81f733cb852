//! # Leadership Hierarchy
//!
//! Ranked leadership roles over a forest of devotee nodes, and the engine
//! that mutates that forest.
//!
//! ## Invariants
//! - Following `reporting_to` from any node never revisits a node
//! - Rank changes follow the static table in [`HierarchyPolicy`]
//! - Every committed mutation appends exactly one top-level
//!   [`RoleChangeHistory`] record, plus one per cascaded subordinate
//! - A rejected mutation writes nothing
//!
//! ## Components
//! - [`HierarchyPolicy`]: rank levels and legal transitions
//! - [`CycleGuard`]: reports-to cycle detection
//! - [`SubordinateTransferEngine`]: batch supervisor reassignment
//! - [`RoleTransitionEngine`]: promote / demote / remove-role with cascades

mod cycle;
mod engine;
mod errors;
mod history;
mod node;
mod policy;
mod request;
mod role;
mod transfer;

pub use cycle::CycleGuard;
pub use engine::{RoleTransitionEngine, MAX_HISTORY_PAGE_SIZE};
pub use errors::{HierarchyError, HierarchyResult};
pub use history::{ChangeTag, RoleChange, RoleChangeHistory};
pub use node::{ActorId, DevoteeId, DevoteeNode};
pub use policy::{ChangeKind, HierarchyPolicy, ValidationReport};
pub use request::{
    DemoteRequest, HistoryPage, PromoteRequest, RankGroup, RemoveRoleRequest, RoleChangeResult,
    RoleOptions, TransferResult, TransferSubordinatesRequest,
};
pub use role::{LeadershipRole, UnknownRole};
pub use transfer::{
    SubordinateTransferEngine, DEMOTION_CASCADE_REASON, PROMOTION_CASCADE_REASON,
    REMOVAL_CASCADE_REASON,
};
