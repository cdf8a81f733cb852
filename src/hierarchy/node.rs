//! Devotee nodes
//!
//! The forest is stored by id: a node names its supervisor through
//! `reporting_to`, never through a reference to another node.

use serde::{Deserialize, Serialize};

use super::role::LeadershipRole;

/// Identity of a devotee record.
pub type DevoteeId = i64;

/// Identity of the authenticated user performing a change.
pub type ActorId = i64;

/// A member record that may hold a leadership rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevoteeNode {
    pub id: DevoteeId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub role: Option<LeadershipRole>,

    /// Supervisor id; `None` at the top of a tree or when unaffiliated
    #[serde(default)]
    pub reporting_to: Option<DevoteeId>,

    #[serde(default)]
    pub has_system_access: bool,

    /// Informational scope tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_code: Option<String>,
}

impl DevoteeNode {
    /// Create an unaffiliated devotee with no role.
    pub fn new(id: DevoteeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: None,
            reporting_to: None,
            has_system_access: false,
            district_code: None,
        }
    }

    pub fn with_role(mut self, role: LeadershipRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_supervisor(mut self, supervisor: DevoteeId) -> Self {
        self.reporting_to = Some(supervisor);
        self
    }

    pub fn with_district(mut self, code: impl Into<String>) -> Self {
        self.district_code = Some(code.into());
        self
    }

    pub fn with_system_access(mut self, access: bool) -> Self {
        self.has_system_access = access;
        self
    }

    /// Whether the devotee holds any leadership rank.
    pub fn is_leader(&self) -> bool {
        self.role.is_some()
    }
}
