//! Request and result shapes for hierarchy operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::history::RoleChangeHistory;
use super::node::{DevoteeId, DevoteeNode};
use super::role::LeadershipRole;

/// Promote a devotee one rank up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteRequest {
    pub devotee_id: DevoteeId,
    pub target_role: Option<LeadershipRole>,
    #[serde(default)]
    pub new_supervisor_id: Option<DevoteeId>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub district_code: Option<String>,
}

impl PromoteRequest {
    pub fn new(devotee_id: DevoteeId, target_role: LeadershipRole) -> Self {
        Self {
            devotee_id,
            target_role: Some(target_role),
            new_supervisor_id: None,
            reason: String::new(),
            district_code: None,
        }
    }

    pub fn supervisor(mut self, id: DevoteeId) -> Self {
        self.new_supervisor_id = Some(id);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn district(mut self, code: impl Into<String>) -> Self {
        self.district_code = Some(code.into());
        self
    }
}

/// Demote a devotee. Without `target_role` the next rank down is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoteRequest {
    pub devotee_id: DevoteeId,
    #[serde(default)]
    pub target_role: Option<LeadershipRole>,
    #[serde(default)]
    pub new_supervisor_id: Option<DevoteeId>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub district_code: Option<String>,
}

impl DemoteRequest {
    pub fn new(devotee_id: DevoteeId) -> Self {
        Self {
            devotee_id,
            target_role: None,
            new_supervisor_id: None,
            reason: String::new(),
            district_code: None,
        }
    }

    pub fn to_role(mut self, role: LeadershipRole) -> Self {
        self.target_role = Some(role);
        self
    }

    pub fn supervisor(mut self, id: DevoteeId) -> Self {
        self.new_supervisor_id = Some(id);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn district(mut self, code: impl Into<String>) -> Self {
        self.district_code = Some(code.into());
        self
    }
}

/// Strip a devotee's leadership role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRoleRequest {
    pub devotee_id: DevoteeId,
    #[serde(default)]
    pub new_supervisor_id: Option<DevoteeId>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub district_code: Option<String>,
}

impl RemoveRoleRequest {
    pub fn new(devotee_id: DevoteeId) -> Self {
        Self {
            devotee_id,
            new_supervisor_id: None,
            reason: String::new(),
            district_code: None,
        }
    }

    pub fn supervisor(mut self, id: DevoteeId) -> Self {
        self.new_supervisor_id = Some(id);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn district(mut self, code: impl Into<String>) -> Self {
        self.district_code = Some(code.into());
        self
    }
}

/// Move direct subordinates of one node under another (or detach them).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSubordinatesRequest {
    pub from_devotee_id: DevoteeId,
    #[serde(default)]
    pub to_devotee_id: Option<DevoteeId>,
    pub subordinate_ids: Vec<DevoteeId>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub district_code: Option<String>,
}

impl TransferSubordinatesRequest {
    pub fn new(from: DevoteeId, to: Option<DevoteeId>, subordinate_ids: Vec<DevoteeId>) -> Self {
        Self {
            from_devotee_id: from,
            to_devotee_id: to,
            subordinate_ids,
            reason: String::new(),
            district_code: None,
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn district(mut self, code: impl Into<String>) -> Self {
        self.district_code = Some(code.into());
        self
    }
}

/// Outcome of promote, demote, or remove-role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeResult {
    pub devotee: DevoteeNode,
    pub subordinates_transferred: usize,
    pub audit_record_id: Uuid,
    pub message: String,
}

/// Outcome of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub count: usize,
    pub updated_subordinates: Vec<DevoteeNode>,
    pub message: String,
}

/// One page of a devotee's role history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub devotee_id: DevoteeId,
    pub records: Vec<RoleChangeHistory>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

/// Role holders of one rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankGroup {
    pub role: LeadershipRole,
    pub level: i32,
    pub leaders: Vec<DevoteeNode>,
}


/// Rank moves open to one devotee and where it sits in the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleOptions {
    pub devotee_id: DevoteeId,
    pub current_role: Option<LeadershipRole>,
    pub promotion_targets: Vec<LeadershipRole>,
    pub demotion_targets: Vec<LeadershipRole>,
    /// Rank a supervisor of this devotee holds
    pub supervisor_role: Option<LeadershipRole>,
    /// Rank this devotee's direct reports hold
    pub managed_role: Option<LeadershipRole>,
    /// Supervisor ids above the devotee, nearest first
    pub reporting_chain: Vec<DevoteeId>,
}
