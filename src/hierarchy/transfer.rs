//! Subordinate Transfer Engine
//!
//! Moves a batch of direct subordinates from one supervisor to another (or
//! detaches them when there is no target). Every check runs before the first
//! write, so a rejected transfer leaves the directory untouched.
//!
//! The role transition engine drives cascades through [`SubordinateTransferEngine::transfer_within`]
//! so that the cascade and the triggering role change share one transaction.

use std::collections::HashSet;
use std::sync::Arc;

use super::cycle::CycleGuard;
use super::errors::{HierarchyError, HierarchyResult};
use super::history::{ChangeTag, RoleChange};
use super::node::{ActorId, DevoteeId, DevoteeNode};
use super::request::{TransferResult, TransferSubordinatesRequest};
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::store::{Directory, DirectoryTx};

/// Reason recorded on subordinates moved by a promotion.
pub const PROMOTION_CASCADE_REASON: &str = "Automatic transfer due to promotion";
/// Reason recorded on subordinates moved by a demotion.
pub const DEMOTION_CASCADE_REASON: &str = "Automatic transfer due to demotion";
/// Reason recorded on subordinates moved by a role removal.
pub const REMOVAL_CASCADE_REASON: &str = "Automatic transfer due to role removal";

/// A validated-on-apply transfer.
#[derive(Debug, Clone)]
pub(crate) struct TransferPlan<'a> {
    pub from: DevoteeId,
    pub to: Option<DevoteeId>,
    pub subordinate_ids: &'a [DevoteeId],
    pub reason: &'a str,
    pub district_code: Option<&'a str>,
    pub actor: ActorId,
}

/// Subordinate Transfer Engine
pub struct SubordinateTransferEngine<D> {
    directory: Arc<D>,
    metrics: Arc<MetricsRegistry>,
}

impl<D: Directory> SubordinateTransferEngine<D> {
    pub fn new(directory: Arc<D>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { directory, metrics }
    }

    /// Transfer subordinates in their own transaction.
    pub fn transfer(
        &self,
        request: &TransferSubordinatesRequest,
        actor: ActorId,
    ) -> HierarchyResult<TransferResult> {
        let plan = TransferPlan {
            from: request.from_devotee_id,
            to: request.to_devotee_id,
            subordinate_ids: &request.subordinate_ids,
            reason: &request.reason,
            district_code: request.district_code.as_deref(),
            actor,
        };

        let outcome = self
            .directory
            .transaction(|tx| Self::transfer_within(tx, &plan));

        let updated = match outcome {
            Ok(updated) => updated,
            Err(e) => {
                record_rejection(&self.metrics, "TRANSFER", request.from_devotee_id, actor, &e);
                return Err(e);
            }
        };

        self.metrics.increment_transfers();
        self.metrics.add_subordinates_moved(updated.len() as u64);

        let from = plan.from.to_string();
        let to = plan.to.map(|id| id.to_string()).unwrap_or_else(|| "NONE".to_string());
        let count = updated.len().to_string();
        let actor = actor.to_string();
        Logger::info(
            Event::TransferCommitted.as_str(),
            &[
                ("from_id", from.as_str()),
                ("to_id", to.as_str()),
                ("count", count.as_str()),
                ("actor_id", actor.as_str()),
            ],
        );

        Ok(TransferResult {
            count: updated.len(),
            updated_subordinates: updated,
            message: "Subordinates transferred successfully".to_string(),
        })
    }

    /// Validate and apply a transfer inside an open transaction.
    ///
    /// Returns the updated nodes in request order. On error nothing has been
    /// written through `tx`.
    pub(crate) fn transfer_within(
        tx: &mut dyn DirectoryTx,
        plan: &TransferPlan<'_>,
    ) -> HierarchyResult<Vec<DevoteeNode>> {
        let mut errors = Vec::new();

        if plan.subordinate_ids.is_empty() {
            errors.push("At least one subordinate must be specified".to_string());
        }
        if plan.reason.trim().is_empty() {
            errors.push("Reason is required".to_string());
        }
        if plan.to == Some(plan.from) {
            errors.push(format!(
                "Cannot transfer subordinates of {} to the same supervisor",
                plan.from
            ));
        }

        let mut seen = HashSet::new();
        let mut subordinates = Vec::with_capacity(plan.subordinate_ids.len());
        for &id in plan.subordinate_ids {
            if !seen.insert(id) {
                errors.push(format!("Duplicate subordinate id: {}", id));
                continue;
            }
            match tx.find_by_id(id)? {
                Some(node) if node.reporting_to == Some(plan.from) => subordinates.push(node),
                Some(_) => errors.push(format!(
                    "Devotee {} does not report to devotee {}",
                    id, plan.from
                )),
                None => errors.push(format!("Devotee {} not found", id)),
            }
        }

        if let Some(to) = plan.to {
            match tx.find_by_id(to)? {
                Some(supervisor) if supervisor.is_leader() => {}
                Some(_) => errors.push(format!(
                    "New supervisor {} does not hold a leadership role",
                    to
                )),
                None => errors.push(format!("New supervisor {} does not exist", to)),
            }
        }

        if !errors.is_empty() {
            return Err(HierarchyError::Validation(errors));
        }

        if let Some(to) = plan.to {
            for node in &subordinates {
                if CycleGuard::would_create_cycle(&*tx, node.id, to)? {
                    return Err(HierarchyError::CircularReference(format!(
                        "Moving devotee {} under devotee {} would create a reporting cycle",
                        node.id, to
                    )));
                }
            }
        }

        let district = plan.district_code.map(str::to_string);
        let mut updated = Vec::with_capacity(subordinates.len());
        for mut node in subordinates {
            let previous = node.reporting_to;
            node.reporting_to = plan.to;
            tx.save(&node)?;

            let record = RoleChange::new(ChangeTag::Transfer, node.id, plan.actor)
                .reason(plan.reason)
                .roles(node.role, node.role)
                .reporting(previous, plan.to)
                .district(district.clone())
                .record();
            tx.append(record)?;

            updated.push(node);
        }

        Ok(updated)
    }
}

/// Count and log a mutation that did not commit.
pub(crate) fn record_rejection(
    metrics: &MetricsRegistry,
    operation: &str,
    devotee_id: DevoteeId,
    actor: ActorId,
    error: &HierarchyError,
) {
    if error.is_client_error() {
        metrics.increment_rejected();
    } else {
        metrics.increment_failed();
    }

    let devotee = devotee_id.to_string();
    let actor = actor.to_string();
    let reason = error.to_string();
    let fields = [
        ("operation", operation),
        ("devotee_id", devotee.as_str()),
        ("actor_id", actor.as_str()),
        ("kind", error.kind()),
        ("error", reason.as_str()),
    ];
    if error.is_client_error() {
        Logger::warn(Event::MutationRejected.as_str(), &fields);
    } else {
        Logger::error(Event::MutationRejected.as_str(), &fields);
    }
}
