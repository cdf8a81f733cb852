//! Role Transition Engine
//!
//! Orchestrates promote, demote, and remove-role. Each call runs as one
//! directory transaction:
//!
//! 1. Load the devotee and resolve the target rank
//! 2. Check the rank table, the reason, the new supervisor, and cycles
//! 3. Cascade direct subordinates to the new supervisor when required
//! 4. Persist the devotee and append exactly one top-level history record
//!
//! Any failure before commit discards every staged write.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use uuid::Uuid;

use super::cycle::CycleGuard;
use super::errors::{HierarchyError, HierarchyResult};
use super::history::{ChangeTag, RoleChange};
use super::node::{ActorId, DevoteeId, DevoteeNode};
use super::policy::{ChangeKind, HierarchyPolicy};
use super::request::{
    DemoteRequest, HistoryPage, PromoteRequest, RankGroup, RemoveRoleRequest, RoleChangeResult,
    RoleOptions, TransferResult, TransferSubordinatesRequest,
};
use super::role::{role_label, LeadershipRole};
use super::transfer::{
    record_rejection, SubordinateTransferEngine, TransferPlan, DEMOTION_CASCADE_REASON,
    PROMOTION_CASCADE_REASON, REMOVAL_CASCADE_REASON,
};
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::store::{Directory, DirectoryTx};

/// Largest role history page a caller may request.
pub const MAX_HISTORY_PAGE_SIZE: usize = 100;

/// One requested role change, normalized across the three operations.
#[derive(Debug, Clone)]
struct Transition<'a> {
    kind: ChangeKind,
    devotee_id: DevoteeId,
    target_role: Option<LeadershipRole>,
    new_supervisor_id: Option<DevoteeId>,
    reason: &'a str,
    district_code: Option<&'a str>,
    actor: ActorId,
}

impl Transition<'_> {
    fn tag(&self) -> ChangeTag {
        match self.kind {
            ChangeKind::Promote => ChangeTag::Promotion,
            ChangeKind::Demote => ChangeTag::Demotion,
            ChangeKind::Remove => ChangeTag::RoleRemoval,
        }
    }

    fn cascade_reason(&self) -> &'static str {
        match self.kind {
            ChangeKind::Promote => PROMOTION_CASCADE_REASON,
            ChangeKind::Demote => DEMOTION_CASCADE_REASON,
            ChangeKind::Remove => REMOVAL_CASCADE_REASON,
        }
    }

    fn success_message(&self) -> &'static str {
        match self.kind {
            ChangeKind::Promote => "Devotee promoted successfully",
            ChangeKind::Demote => "Devotee demoted successfully",
            ChangeKind::Remove => "Role removed successfully",
        }
    }

    fn committed_event(&self) -> Event {
        match self.kind {
            ChangeKind::Promote => Event::PromotionCommitted,
            ChangeKind::Demote => Event::DemotionCommitted,
            ChangeKind::Remove => Event::RoleRemovalCommitted,
        }
    }
}

/// What a committed transition produced.
struct Applied {
    devotee: DevoteeNode,
    previous_role: Option<LeadershipRole>,
    subordinates_transferred: usize,
    audit_record_id: Uuid,
    warnings: Vec<String>,
}

/// Role Transition Engine
pub struct RoleTransitionEngine<D> {
    directory: Arc<D>,
    metrics: Arc<MetricsRegistry>,
    transfers: SubordinateTransferEngine<D>,
}

impl<D: Directory> RoleTransitionEngine<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self::with_metrics(directory, Arc::new(MetricsRegistry::new()))
    }

    pub fn with_metrics(directory: Arc<D>, metrics: Arc<MetricsRegistry>) -> Self {
        let transfers = SubordinateTransferEngine::new(Arc::clone(&directory), Arc::clone(&metrics));
        Self {
            directory,
            metrics,
            transfers,
        }
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Promote a devotee to a higher rank.
    pub fn promote(&self, request: &PromoteRequest, actor: ActorId) -> HierarchyResult<RoleChangeResult> {
        self.commit(Transition {
            kind: ChangeKind::Promote,
            devotee_id: request.devotee_id,
            target_role: request.target_role,
            new_supervisor_id: request.new_supervisor_id,
            reason: &request.reason,
            district_code: request.district_code.as_deref(),
            actor,
        })
    }

    /// Demote a devotee. Subordinates always move to the new supervisor.
    pub fn demote(&self, request: &DemoteRequest, actor: ActorId) -> HierarchyResult<RoleChangeResult> {
        self.commit(Transition {
            kind: ChangeKind::Demote,
            devotee_id: request.devotee_id,
            target_role: request.target_role,
            new_supervisor_id: request.new_supervisor_id,
            reason: &request.reason,
            district_code: request.district_code.as_deref(),
            actor,
        })
    }

    /// Strip a devotee's role, detach them, and revoke system access.
    pub fn remove_role(
        &self,
        request: &RemoveRoleRequest,
        actor: ActorId,
    ) -> HierarchyResult<RoleChangeResult> {
        self.commit(Transition {
            kind: ChangeKind::Remove,
            devotee_id: request.devotee_id,
            target_role: None,
            new_supervisor_id: request.new_supervisor_id,
            reason: &request.reason,
            district_code: request.district_code.as_deref(),
            actor,
        })
    }

    /// Move direct subordinates between supervisors.
    pub fn transfer_subordinates(
        &self,
        request: &TransferSubordinatesRequest,
        actor: ActorId,
    ) -> HierarchyResult<TransferResult> {
        self.transfers.transfer(request, actor)
    }

    fn commit(&self, transition: Transition<'_>) -> HierarchyResult<RoleChangeResult> {
        let outcome = self
            .directory
            .transaction(|tx| Self::apply_within(tx, &transition));

        let applied = match outcome {
            Ok(applied) => applied,
            Err(e) => {
                record_rejection(
                    &self.metrics,
                    transition.kind.as_str(),
                    transition.devotee_id,
                    transition.actor,
                    &e,
                );
                return Err(e);
            }
        };

        match transition.kind {
            ChangeKind::Promote => self.metrics.increment_promotions(),
            ChangeKind::Demote => self.metrics.increment_demotions(),
            ChangeKind::Remove => self.metrics.increment_role_removals(),
        }
        self.metrics
            .add_subordinates_moved(applied.subordinates_transferred as u64);

        let devotee = applied.devotee.id.to_string();
        let actor = transition.actor.to_string();
        let moved = applied.subordinates_transferred.to_string();
        let audit_id = applied.audit_record_id.to_string();
        let warnings = applied.warnings.join("; ");
        let mut fields = vec![
            ("devotee_id", devotee.as_str()),
            ("actor_id", actor.as_str()),
            ("from_role", role_label(applied.previous_role)),
            ("to_role", role_label(applied.devotee.role)),
            ("subordinates_transferred", moved.as_str()),
            ("audit_record_id", audit_id.as_str()),
        ];
        if !warnings.is_empty() {
            fields.push(("warnings", warnings.as_str()));
        }
        Logger::info(transition.committed_event().as_str(), &fields);

        Ok(RoleChangeResult {
            devotee: applied.devotee,
            subordinates_transferred: applied.subordinates_transferred,
            audit_record_id: applied.audit_record_id,
            message: transition.success_message().to_string(),
        })
    }

    fn apply_within(tx: &mut dyn DirectoryTx, t: &Transition<'_>) -> HierarchyResult<Applied> {
        let mut node = tx
            .find_by_id(t.devotee_id)?
            .ok_or(HierarchyError::DevoteeNotFound(t.devotee_id))?;
        let current = node.role;

        let target = match t.kind {
            ChangeKind::Promote => t.target_role,
            ChangeKind::Demote => t
                .target_role
                .or_else(|| HierarchyPolicy::default_demotion_target(current)),
            ChangeKind::Remove => None,
        };

        let mut report = HierarchyPolicy::validate_change(current, target, t.kind);
        if t.reason.trim().is_empty() {
            report.push_error("Reason is required");
        }
        let warnings = report.into_result()?;

        if let Some(supervisor) = t.new_supervisor_id {
            if !tx.exists(supervisor)? {
                return Err(HierarchyError::SupervisorNotFound(supervisor));
            }
            if t.kind != ChangeKind::Remove
                && CycleGuard::would_create_cycle(&*tx, t.devotee_id, supervisor)?
            {
                return Err(HierarchyError::CircularReference(format!(
                    "Devotee {} cannot report to devotee {}: it is the same devotee or one of its subordinates",
                    t.devotee_id, supervisor
                )));
            }
        }

        let subordinates = tx.find_direct_subordinates(t.devotee_id)?;
        let cascade = !subordinates.is_empty()
            && match t.kind {
                ChangeKind::Promote => {
                    HierarchyPolicy::level_of(target) < HierarchyPolicy::level_of(current)
                }
                ChangeKind::Demote | ChangeKind::Remove => true,
            };

        let mut transferred = 0;
        if cascade {
            if t.new_supervisor_id.is_none() {
                return Err(HierarchyError::validation(format!(
                    "Must provide new supervisor for subordinates: devotee {} has {} direct report(s)",
                    t.devotee_id,
                    subordinates.len()
                )));
            }
            let ids: Vec<DevoteeId> = subordinates.iter().map(|n| n.id).collect();
            let plan = TransferPlan {
                from: t.devotee_id,
                to: t.new_supervisor_id,
                subordinate_ids: &ids,
                reason: t.cascade_reason(),
                district_code: t.district_code,
                actor: t.actor,
            };
            transferred = SubordinateTransferEngine::<D>::transfer_within(tx, &plan)?.len();
        }

        let previous_reporting_to = node.reporting_to;
        match t.kind {
            ChangeKind::Promote | ChangeKind::Demote => {
                node.role = target;
                node.reporting_to = t.new_supervisor_id;
            }
            ChangeKind::Remove => {
                node.role = None;
                node.reporting_to = None;
                node.has_system_access = false;
            }
        }
        tx.save(&node)?;

        let record = RoleChange::new(t.tag(), node.id, t.actor)
            .reason(t.reason)
            .roles(current, node.role)
            .reporting(previous_reporting_to, node.reporting_to)
            .district(t.district_code.map(str::to_string))
            .subordinates_transferred(transferred)
            .record();
        let audit_record_id = record.id();
        tx.append(record)?;

        Ok(Applied {
            devotee: node,
            previous_role: current,
            subordinates_transferred: transferred,
            audit_record_id,
            warnings,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Candidates to supervise a holder of `target_role`.
    ///
    /// `district_code` is accepted for callers that scope by district but is
    /// not applied as a filter.
    pub fn available_supervisors(
        &self,
        district_code: Option<&str>,
        target_role: LeadershipRole,
        exclude_ids: &[DevoteeId],
    ) -> HierarchyResult<Vec<DevoteeNode>> {
        let _ = district_code;
        let Some(supervising_role) = HierarchyPolicy::reporting_role_for(Some(target_role)) else {
            return Ok(Vec::new());
        };

        let excluded: HashSet<DevoteeId> = exclude_ids.iter().copied().collect();
        let candidates = self
            .directory
            .read(|view| view.find_by_role(supervising_role))?;
        Ok(candidates
            .into_iter()
            .filter(|n| !excluded.contains(&n.id))
            .collect())
    }

    /// Nodes reporting directly to `devotee_id`.
    pub fn direct_subordinates(&self, devotee_id: DevoteeId) -> HierarchyResult<Vec<DevoteeNode>> {
        self.directory.read(|view| {
            if !view.exists(devotee_id)? {
                return Err(HierarchyError::DevoteeNotFound(devotee_id));
            }
            Ok(view.find_direct_subordinates(devotee_id)?)
        })
    }

    /// Every node below `devotee_id`, breadth-first.
    ///
    /// Each node appears at most once and the root never appears, even if
    /// the stored data contains a loop.
    pub fn all_subordinates(&self, devotee_id: DevoteeId) -> HierarchyResult<Vec<DevoteeNode>> {
        self.directory.read(|view| {
            if !view.exists(devotee_id)? {
                return Err(HierarchyError::DevoteeNotFound(devotee_id));
            }

            let mut visited = HashSet::from([devotee_id]);
            let mut queue = VecDeque::from([devotee_id]);
            let mut result = Vec::new();

            while let Some(id) = queue.pop_front() {
                for child in view.find_direct_subordinates(id)? {
                    if visited.insert(child.id) {
                        queue.push_back(child.id);
                        result.push(child);
                    }
                }
            }

            Ok(result)
        })
    }

    /// One page of a devotee's history, newest first. Pages start at 0.
    pub fn role_history(
        &self,
        devotee_id: DevoteeId,
        page: usize,
        size: usize,
    ) -> HierarchyResult<HistoryPage> {
        if size == 0 || size > MAX_HISTORY_PAGE_SIZE {
            return Err(HierarchyError::validation(format!(
                "Page size must be between 1 and {}",
                MAX_HISTORY_PAGE_SIZE
            )));
        }

        let history = self.directory.read(|view| {
            if !view.exists(devotee_id)? {
                return Err(HierarchyError::DevoteeNotFound(devotee_id));
            }
            Ok(view.history_for(devotee_id)?)
        })?;

        let total = history.len();
        let records = history
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .collect();

        Ok(HistoryPage {
            devotee_id,
            records,
            page,
            size,
            total,
        })
    }

    /// Legal rank moves for a devotee, with its current supervisor chain.
    pub fn role_options(&self, devotee_id: DevoteeId) -> HierarchyResult<RoleOptions> {
        self.directory.read(|view| {
            let node = view
                .find_by_id(devotee_id)?
                .ok_or(HierarchyError::DevoteeNotFound(devotee_id))?;
            let current = node.role;

            Ok(RoleOptions {
                devotee_id,
                current_role: current,
                promotion_targets: HierarchyPolicy::valid_targets(current, ChangeKind::Promote)
                    .to_vec(),
                demotion_targets: HierarchyPolicy::valid_targets(current, ChangeKind::Demote)
                    .to_vec(),
                supervisor_role: HierarchyPolicy::reporting_role_for(current),
                managed_role: HierarchyPolicy::managed_role(current),
                reporting_chain: CycleGuard::reporting_chain(view, devotee_id)?,
            })
        })
    }

    /// Role holders grouped by rank, highest rank first.
    pub fn leaders_by_rank(&self) -> HierarchyResult<Vec<RankGroup>> {
        self.directory.read(|view| {
            LeadershipRole::ALL
                .iter()
                .map(|&role| -> HierarchyResult<RankGroup> {
                    Ok(RankGroup {
                        role,
                        level: HierarchyPolicy::level_of(Some(role)),
                        leaders: view.find_by_role(role)?,
                    })
                })
                .collect()
        })
    }

    /// Role holders with no supervisor inside the forest.
    pub fn top_level_leaders(&self) -> HierarchyResult<Vec<DevoteeNode>> {
        let all = self.directory.read(|view| view.find_all())?;
        Ok(all
            .into_iter()
            .filter(|n| n.is_leader() && n.reporting_to.is_none())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DevoteeReader, MemoryDirectory};
    use crate::hierarchy::LeadershipRole::*;

    // ========================================================================
    // Fixtures
    // ========================================================================

    /// ```text
    /// 1 MALA
    /// └── 2 MAHA_CHAKRA
    ///     ├── 3 CHAKRA ── 5 UPA, 6 UPA
    ///     └── 4 CHAKRA ── 7 UPA
    /// 8 (no role)
    /// ```
    fn forest() -> Arc<MemoryDirectory> {
        let dir = MemoryDirectory::new();
        let nodes = [
            DevoteeNode::new(1, "mala").with_role(MalaSenapoti),
            DevoteeNode::new(2, "maha").with_role(MahaChakraSenapoti).with_supervisor(1),
            DevoteeNode::new(3, "chakra-a").with_role(ChakraSenapoti).with_supervisor(2),
            DevoteeNode::new(4, "chakra-b").with_role(ChakraSenapoti).with_supervisor(2),
            DevoteeNode::new(5, "upa-a").with_role(UpaChakraSenapoti).with_supervisor(3),
            DevoteeNode::new(6, "upa-b").with_role(UpaChakraSenapoti).with_supervisor(3),
            DevoteeNode::new(7, "upa-c").with_role(UpaChakraSenapoti).with_supervisor(4),
            DevoteeNode::new(8, "member"),
        ];
        for node in nodes {
            dir.import(node.with_system_access(true)).unwrap();
        }
        Arc::new(dir)
    }

    fn node(dir: &MemoryDirectory, id: DevoteeId) -> DevoteeNode {
        dir.read(|view| view.find_by_id(id)).unwrap().unwrap()
    }

    // ========================================================================
    // Promote
    // ========================================================================

    #[test]
    fn test_promote_leaf() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let request = PromoteRequest::new(7, ChakraSenapoti).supervisor(2).reason("merit");
        let result = engine.promote(&request, 100).unwrap();

        assert_eq!(result.devotee.role, Some(ChakraSenapoti));
        assert_eq!(result.devotee.reporting_to, Some(2));
        assert_eq!(result.subordinates_transferred, 0);
        assert_eq!(result.message, "Devotee promoted successfully");

        let history = dir.read(|view| view.history_for(7)).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id(), result.audit_record_id);
        assert_eq!(history[0].reason(), "Promotion: merit");
        assert_eq!(history[0].previous_reporting_to(), Some(4));
    }

    #[test]
    fn test_promote_with_subordinates_cascades() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let request = PromoteRequest::new(3, MahaChakraSenapoti).supervisor(1).reason("growth");
        let result = engine.promote(&request, 100).unwrap();

        assert_eq!(result.subordinates_transferred, 2);
        assert_eq!(node(&dir, 5).reporting_to, Some(1));
        assert_eq!(node(&dir, 6).reporting_to, Some(1));
        let cascade = dir.read(|view| view.history_for(5)).unwrap();
        assert_eq!(cascade[0].reason(), "Transfer: Automatic transfer due to promotion");
        assert_eq!(dir.history_len(), 3);
    }

    #[test]
    fn test_promote_cascade_requires_supervisor() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let request = PromoteRequest::new(3, MahaChakraSenapoti).reason("growth");
        let err = engine.promote(&request, 100).unwrap_err();

        assert!(err.to_string().to_lowercase().contains("must provide new supervisor"));
        assert_eq!(node(&dir, 3).role, Some(ChakraSenapoti));
        assert_eq!(dir.history_len(), 0);
    }

    #[test]
    fn test_promote_rejects_illegal_transition_and_blank_reason() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let skip = PromoteRequest::new(7, MalaSenapoti).reason(" ");
        let err = engine.promote(&skip, 100).unwrap_err();
        assert_eq!(err.violations().len(), 2);

        let no_role = PromoteRequest::new(8, UpaChakraSenapoti).reason("r");
        assert!(matches!(
            engine.promote(&no_role, 100),
            Err(HierarchyError::Validation(_))
        ));
    }

    #[test]
    fn test_promote_under_own_subordinate_is_cycle() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let request = PromoteRequest::new(3, MahaChakraSenapoti).supervisor(5).reason("r");
        let err = engine.promote(&request, 100).unwrap_err();
        assert!(matches!(err, HierarchyError::CircularReference(_)));
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_unknown_devotee_and_supervisor() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let err = engine
            .promote(&PromoteRequest::new(404, ChakraSenapoti).reason("r"), 1)
            .unwrap_err();
        assert!(matches!(err, HierarchyError::DevoteeNotFound(404)));

        let err = engine
            .promote(&PromoteRequest::new(7, ChakraSenapoti).supervisor(405).reason("r"), 1)
            .unwrap_err();
        assert!(matches!(err, HierarchyError::SupervisorNotFound(405)));
    }

    // ========================================================================
    // Demote
    // ========================================================================

    #[test]
    fn test_demote_defaults_to_next_rank() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let request = DemoteRequest::new(4).supervisor(3).reason("restructure");
        let result = engine.demote(&request, 100).unwrap();

        assert_eq!(result.devotee.role, Some(UpaChakraSenapoti));
        assert_eq!(result.devotee.reporting_to, Some(3));
        assert_eq!(result.subordinates_transferred, 1);
        assert_eq!(node(&dir, 7).reporting_to, Some(3));
    }

    #[test]
    fn test_demote_lowest_rank_fails() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let err = engine
            .demote(&DemoteRequest::new(5).reason("r"), 100)
            .unwrap_err();
        assert!(matches!(err, HierarchyError::Validation(_)));
    }

    // ========================================================================
    // Remove
    // ========================================================================

    #[test]
    fn test_remove_role_clears_fields() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let request = RemoveRoleRequest::new(4).supervisor(3).reason("retired");
        let result = engine.remove_role(&request, 100).unwrap();

        assert_eq!(result.devotee.role, None);
        assert_eq!(result.devotee.reporting_to, None);
        assert!(!result.devotee.has_system_access);
        assert_eq!(result.message, "Role removed successfully");
        assert_eq!(node(&dir, 7).reporting_to, Some(3));

        let row = &dir.read(|view| view.history_for(4)).unwrap()[0];
        assert_eq!(row.reason(), "Role Removal: retired");
        assert_eq!(row.previous_role(), Some(ChakraSenapoti));
        assert_eq!(row.new_role(), None);
        assert_eq!(row.subordinates_transferred(), 1);
    }

    #[test]
    fn test_remove_role_requires_role_and_supervisor() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        let err = engine
            .remove_role(&RemoveRoleRequest::new(8).reason("r"), 100)
            .unwrap_err();
        assert!(err.to_string().contains("no current role"));

        let err = engine
            .remove_role(&RemoveRoleRequest::new(3).reason("r"), 100)
            .unwrap_err();
        assert!(matches!(err, HierarchyError::Validation(_)));
        assert_eq!(node(&dir, 3).role, Some(ChakraSenapoti));
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[test]
    fn test_available_supervisors() {
        let engine = RoleTransitionEngine::new(forest());

        let ids: Vec<_> = engine
            .available_supervisors(Some("D1"), UpaChakraSenapoti, &[4])
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![3]);

        assert!(engine
            .available_supervisors(None, MalaSenapoti, &[])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_all_subordinates_breadth_first() {
        let engine = RoleTransitionEngine::new(forest());

        let ids: Vec<_> = engine
            .all_subordinates(1)
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6, 7]);

        assert!(engine.all_subordinates(7).unwrap().is_empty());
        assert!(matches!(
            engine.all_subordinates(404),
            Err(HierarchyError::DevoteeNotFound(404))
        ));
    }

    #[test]
    fn test_all_subordinates_terminates_on_corrupt_loop() {
        let dir = MemoryDirectory::new();
        dir.import(DevoteeNode::new(1, "a").with_supervisor(3)).unwrap();
        dir.import(DevoteeNode::new(2, "b").with_supervisor(1)).unwrap();
        dir.import(DevoteeNode::new(3, "c").with_supervisor(2)).unwrap();
        let engine = RoleTransitionEngine::new(Arc::new(dir));

        let ids: Vec<_> = engine
            .all_subordinates(1)
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_role_history_pages() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        engine
            .promote(&PromoteRequest::new(7, ChakraSenapoti).supervisor(2).reason("one"), 1)
            .unwrap();
        engine
            .demote(&DemoteRequest::new(7).supervisor(3).reason("two"), 1)
            .unwrap();

        let first = engine.role_history(7, 0, 1).unwrap();
        assert_eq!(first.total, 2);
        assert_eq!(first.records[0].reason(), "Demotion: two");

        let second = engine.role_history(7, 1, 1).unwrap();
        assert_eq!(second.records[0].reason(), "Promotion: one");

        assert!(engine.role_history(7, 5, 10).unwrap().records.is_empty());
        assert!(engine.role_history(7, 0, 0).is_err());
    }

    #[test]
    fn test_leaders_overview() {
        let engine = RoleTransitionEngine::new(forest());

        let groups = engine.leaders_by_rank().unwrap();
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].role, MalaSenapoti);
        assert_eq!(groups[2].leaders.len(), 2);
        assert_eq!(groups[3].level, 4);

        let top: Vec<_> = engine
            .top_level_leaders()
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(top, vec![1]);
    }

    #[test]
    fn test_metrics_follow_outcomes() {
        let dir = forest();
        let engine = RoleTransitionEngine::new(Arc::clone(&dir));

        engine
            .promote(&PromoteRequest::new(3, MahaChakraSenapoti).supervisor(1).reason("r"), 1)
            .unwrap();
        let _ = engine.demote(&DemoteRequest::new(404).reason("r"), 1);

        let snapshot = engine.metrics().snapshot();
        assert_eq!(snapshot.promotions, 1);
        assert_eq!(snapshot.subordinates_moved, 2);
        assert_eq!(snapshot.mutations_rejected, 1);
    }

    #[test]
    fn test_role_options() {
        let engine = RoleTransitionEngine::new(forest());

        let options = engine.role_options(3).unwrap();
        assert_eq!(options.current_role, Some(ChakraSenapoti));
        assert_eq!(options.promotion_targets, vec![MahaChakraSenapoti]);
        assert_eq!(options.demotion_targets, vec![UpaChakraSenapoti]);
        assert_eq!(options.supervisor_role, Some(MahaChakraSenapoti));
        assert_eq!(options.managed_role, Some(UpaChakraSenapoti));
        assert_eq!(options.reporting_chain, vec![2, 1]);

        let member = engine.role_options(8).unwrap();
        assert_eq!(member.promotion_targets.len(), 4);
        assert!(member.demotion_targets.is_empty());
        assert!(member.reporting_chain.is_empty());

        assert!(matches!(
            engine.role_options(404),
            Err(HierarchyError::DevoteeNotFound(404))
        ));
    }
}
