//! Role change history
//!
//! One immutable record per node mutation. A record is assembled through
//! [`RoleChange`] and sealed by [`RoleChange::record`]; once sealed it has
//! no mutators and is only ever appended, cloned, or read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::{ActorId, DevoteeId};
use super::role::LeadershipRole;

/// Operation that produced a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTag {
    Promotion,
    Demotion,
    RoleRemoval,
    Transfer,
}

impl ChangeTag {
    /// Prefix written in front of the caller's reason.
    pub fn prefix(&self) -> &'static str {
        match self {
            ChangeTag::Promotion => "Promotion: ",
            ChangeTag::Demotion => "Demotion: ",
            ChangeTag::RoleRemoval => "Role Removal: ",
            ChangeTag::Transfer => "Transfer: ",
        }
    }
}

/// Audit record of a single node mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeHistory {
    id: Uuid,
    devotee_id: DevoteeId,
    previous_role: Option<LeadershipRole>,
    new_role: Option<LeadershipRole>,
    previous_reporting_to: Option<DevoteeId>,
    new_reporting_to: Option<DevoteeId>,
    changed_by: ActorId,
    reason: String,
    district_code: Option<String>,
    subordinates_transferred: usize,
    timestamp: DateTime<Utc>,
}

impl RoleChangeHistory {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn devotee_id(&self) -> DevoteeId {
        self.devotee_id
    }

    pub fn previous_role(&self) -> Option<LeadershipRole> {
        self.previous_role
    }

    pub fn new_role(&self) -> Option<LeadershipRole> {
        self.new_role
    }

    pub fn previous_reporting_to(&self) -> Option<DevoteeId> {
        self.previous_reporting_to
    }

    pub fn new_reporting_to(&self) -> Option<DevoteeId> {
        self.new_reporting_to
    }

    pub fn changed_by(&self) -> ActorId {
        self.changed_by
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn district_code(&self) -> Option<&str> {
        self.district_code.as_deref()
    }

    pub fn subordinates_transferred(&self) -> usize {
        self.subordinates_transferred
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Draft of a history record.
#[derive(Debug, Clone)]
pub struct RoleChange {
    tag: ChangeTag,
    devotee_id: DevoteeId,
    changed_by: ActorId,
    reason: String,
    previous_role: Option<LeadershipRole>,
    new_role: Option<LeadershipRole>,
    previous_reporting_to: Option<DevoteeId>,
    new_reporting_to: Option<DevoteeId>,
    district_code: Option<String>,
    subordinates_transferred: usize,
}

impl RoleChange {
    pub fn new(tag: ChangeTag, devotee_id: DevoteeId, changed_by: ActorId) -> Self {
        Self {
            tag,
            devotee_id,
            changed_by,
            reason: String::new(),
            previous_role: None,
            new_role: None,
            previous_reporting_to: None,
            new_reporting_to: None,
            district_code: None,
            subordinates_transferred: 0,
        }
    }

    /// Caller-supplied reason; the tag prefix is added when sealing.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn roles(
        mut self,
        previous: Option<LeadershipRole>,
        new: Option<LeadershipRole>,
    ) -> Self {
        self.previous_role = previous;
        self.new_role = new;
        self
    }

    pub fn reporting(mut self, previous: Option<DevoteeId>, new: Option<DevoteeId>) -> Self {
        self.previous_reporting_to = previous;
        self.new_reporting_to = new;
        self
    }

    pub fn district(mut self, code: Option<String>) -> Self {
        self.district_code = code;
        self
    }

    pub fn subordinates_transferred(mut self, count: usize) -> Self {
        self.subordinates_transferred = count;
        self
    }

    /// Seal the draft: assigns id and timestamp.
    pub fn record(self) -> RoleChangeHistory {
        RoleChangeHistory {
            id: Uuid::new_v4(),
            devotee_id: self.devotee_id,
            previous_role: self.previous_role,
            new_role: self.new_role,
            previous_reporting_to: self.previous_reporting_to,
            new_reporting_to: self.new_reporting_to,
            changed_by: self.changed_by,
            reason: format!("{}{}", self.tag.prefix(), self.reason),
            district_code: self.district_code,
            subordinates_transferred: self.subordinates_transferred,
            timestamp: Utc::now(),
        }
    }
}
