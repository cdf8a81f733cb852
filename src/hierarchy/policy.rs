//! Hierarchy Policy
//!
//! Static rank table: level, supervising rank, and the legal promotion and
//! demotion targets for every leadership role.
//!
//! Policy logic is:
//! - Deterministic
//! - Side-effect free
//! - Fully explainable (every rejected change carries its reasons)

use super::errors::{HierarchyError, HierarchyResult};
use super::role::LeadershipRole;

use super::role::LeadershipRole::{ChakraSenapoti, MahaChakraSenapoti, MalaSenapoti, UpaChakraSenapoti};

/// One row of the rank table.
#[derive(Debug)]
struct RankEntry {
    level: i32,
    /// `None` means the supervisor sits outside the forest (district supervisor).
    reports_to: Option<LeadershipRole>,
    promote_to: &'static [LeadershipRole],
    demote_to: &'static [LeadershipRole],
    manages: Option<LeadershipRole>,
}

static MALA: RankEntry = RankEntry {
    level: 1,
    reports_to: None,
    promote_to: &[],
    demote_to: &[MahaChakraSenapoti],
    manages: Some(MahaChakraSenapoti),
};

static MAHA_CHAKRA: RankEntry = RankEntry {
    level: 2,
    reports_to: Some(MalaSenapoti),
    promote_to: &[MalaSenapoti],
    demote_to: &[ChakraSenapoti, UpaChakraSenapoti],
    manages: Some(ChakraSenapoti),
};

static CHAKRA: RankEntry = RankEntry {
    level: 3,
    reports_to: Some(MahaChakraSenapoti),
    promote_to: &[MahaChakraSenapoti],
    demote_to: &[UpaChakraSenapoti],
    manages: Some(UpaChakraSenapoti),
};

static UPA_CHAKRA: RankEntry = RankEntry {
    level: 4,
    reports_to: Some(ChakraSenapoti),
    promote_to: &[ChakraSenapoti],
    demote_to: &[],
    manages: None,
};

/// Kind of role change being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Move to a higher-authority rank
    Promote,
    /// Move to a lower-authority rank
    Demote,
    /// Strip the role entirely
    Remove,
}

impl ChangeKind {
    /// Returns the change name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Promote => "PROMOTE",
            ChangeKind::Demote => "DEMOTE",
            ChangeKind::Remove => "REMOVE",
        }
    }
}

/// Outcome of evaluating a change against the rank table.
///
/// Errors block the change; warnings are advisory and only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationReport {
    /// Create an empty (valid) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violated rule.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record an advisory note.
    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Convert into a result carrying every violated rule.
    pub fn into_result(self) -> HierarchyResult<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(HierarchyError::Validation(self.errors))
        }
    }
}

/// Hierarchy Policy
///
/// Pure lookups over the rank table. Absent roles never satisfy a
/// transition and have level `-1`.
pub struct HierarchyPolicy;

impl HierarchyPolicy {
    fn entry(role: LeadershipRole) -> &'static RankEntry {
        match role {
            MalaSenapoti => &MALA,
            MahaChakraSenapoti => &MAHA_CHAKRA,
            ChakraSenapoti => &CHAKRA,
            UpaChakraSenapoti => &UPA_CHAKRA,
        }
    }

    /// Rank level (1 = highest authority), or -1 when no role is held.
    pub fn level_of(role: Option<LeadershipRole>) -> i32 {
        role.map(|r| Self::entry(r).level).unwrap_or(-1)
    }

    /// Whether `from` may be promoted directly to `to`.
    pub fn can_promote(from: Option<LeadershipRole>, to: Option<LeadershipRole>) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => Self::entry(from).promote_to.contains(&to),
            _ => false,
        }
    }

    /// Whether `from` may be demoted directly to `to`.
    pub fn can_demote(from: Option<LeadershipRole>, to: Option<LeadershipRole>) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => Self::entry(from).demote_to.contains(&to),
            _ => false,
        }
    }

    /// Rank a holder of `role` reports to inside the forest.
    ///
    /// `MALA_SENAPOTI` reports to an external district supervisor, so it has none.
    pub fn reporting_role_for(role: Option<LeadershipRole>) -> Option<LeadershipRole> {
        role.and_then(|r| Self::entry(r).reports_to)
    }

    /// Rank that reports directly to a holder of `role`.
    pub fn managed_role(role: Option<LeadershipRole>) -> Option<LeadershipRole> {
        role.and_then(|r| Self::entry(r).manages)
    }

    /// Next rank down, used when a demotion does not name a target.
    pub fn default_demotion_target(role: Option<LeadershipRole>) -> Option<LeadershipRole> {
        role.and_then(|r| Self::entry(r).demote_to.first().copied())
    }

    /// Ranks a devotee holding `current` may move to with the given change.
    ///
    /// A devotee without a role may be assigned any rank.
    pub fn valid_targets(
        current: Option<LeadershipRole>,
        change: ChangeKind,
    ) -> &'static [LeadershipRole] {
        let Some(current) = current else {
            return match change {
                ChangeKind::Remove => &[],
                _ => &LeadershipRole::ALL,
            };
        };
        let entry = Self::entry(current);
        match change {
            ChangeKind::Promote => entry.promote_to,
            ChangeKind::Demote => entry.demote_to,
            ChangeKind::Remove => &[],
        }
    }

    /// Evaluate a change and collect every violated rule.
    pub fn validate_change(
        current: Option<LeadershipRole>,
        target: Option<LeadershipRole>,
        change: ChangeKind,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        match change {
            ChangeKind::Remove => {
                if current.is_none() {
                    report.push_error("Cannot remove role: devotee has no current role");
                }
            }
            ChangeKind::Promote => match (current, target) {
                (None, _) => report.push_error("Cannot promote: devotee has no current role"),
                (_, None) => report.push_error("Cannot promote: target role is required"),
                (Some(from), Some(to)) => {
                    if !Self::can_promote(current, target) {
                        report.push_error(format!(
                            "Cannot promote from {} to {} - not allowed by hierarchy rules",
                            from, to
                        ));
                    }
                }
            },
            ChangeKind::Demote => match (current, target) {
                (None, _) => report.push_error("Cannot demote: devotee has no current role"),
                (_, None) => report.push_error("Cannot demote: target role is required"),
                (Some(from), Some(to)) => {
                    if !Self::can_demote(current, target) {
                        report.push_error(format!(
                            "Cannot demote from {} to {} - not allowed by hierarchy rules",
                            from, to
                        ));
                    } else if Self::level_of(target) - Self::level_of(current) > 1 {
                        report.push_warning(format!(
                            "Demotion from {} to {} skips an intermediate rank",
                            from, to
                        ));
                    }
                }
            },
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_strictly_ordered() {
        let levels: Vec<i32> = LeadershipRole::ALL
            .iter()
            .map(|r| HierarchyPolicy::level_of(Some(*r)))
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        assert_eq!(HierarchyPolicy::level_of(None), -1);
    }

    #[test]
    fn test_never_promote_or_demote_to_same_role() {
        for role in LeadershipRole::ALL {
            assert!(!HierarchyPolicy::can_promote(Some(role), Some(role)));
            assert!(!HierarchyPolicy::can_demote(Some(role), Some(role)));
        }
    }

    #[test]
    fn test_absent_arguments_never_allowed() {
        for role in LeadershipRole::ALL {
            assert!(!HierarchyPolicy::can_promote(None, Some(role)));
            assert!(!HierarchyPolicy::can_promote(Some(role), None));
            assert!(!HierarchyPolicy::can_demote(None, Some(role)));
            assert!(!HierarchyPolicy::can_demote(Some(role), None));
        }
        assert!(!HierarchyPolicy::can_promote(None, None));
    }

    #[test]
    fn test_transition_table() {
        assert!(HierarchyPolicy::can_promote(Some(UpaChakraSenapoti), Some(ChakraSenapoti)));
        assert!(HierarchyPolicy::can_promote(Some(ChakraSenapoti), Some(MahaChakraSenapoti)));
        assert!(HierarchyPolicy::can_promote(Some(MahaChakraSenapoti), Some(MalaSenapoti)));
        // promotions are one rank at a time
        assert!(!HierarchyPolicy::can_promote(Some(UpaChakraSenapoti), Some(MalaSenapoti)));
        assert!(!HierarchyPolicy::can_promote(Some(MalaSenapoti), Some(MahaChakraSenapoti)));

        assert!(HierarchyPolicy::can_demote(Some(MalaSenapoti), Some(MahaChakraSenapoti)));
        assert!(!HierarchyPolicy::can_demote(Some(MalaSenapoti), Some(ChakraSenapoti)));
        assert!(HierarchyPolicy::can_demote(Some(MahaChakraSenapoti), Some(UpaChakraSenapoti)));
        assert!(!HierarchyPolicy::can_demote(Some(UpaChakraSenapoti), Some(ChakraSenapoti)));
    }

    #[test]
    fn test_reporting_and_managed_roles() {
        assert_eq!(HierarchyPolicy::reporting_role_for(Some(MalaSenapoti)), None);
        assert_eq!(
            HierarchyPolicy::reporting_role_for(Some(ChakraSenapoti)),
            Some(MahaChakraSenapoti)
        );
        assert_eq!(HierarchyPolicy::reporting_role_for(None), None);

        for role in LeadershipRole::ALL {
            if let Some(managed) = HierarchyPolicy::managed_role(Some(role)) {
                assert_eq!(HierarchyPolicy::reporting_role_for(Some(managed)), Some(role));
            }
        }
        assert_eq!(HierarchyPolicy::managed_role(Some(UpaChakraSenapoti)), None);
    }

    #[test]
    fn test_default_demotion_target() {
        assert_eq!(
            HierarchyPolicy::default_demotion_target(Some(ChakraSenapoti)),
            Some(UpaChakraSenapoti)
        );
        assert_eq!(
            HierarchyPolicy::default_demotion_target(Some(MahaChakraSenapoti)),
            Some(ChakraSenapoti)
        );
        assert_eq!(HierarchyPolicy::default_demotion_target(Some(UpaChakraSenapoti)), None);
        assert_eq!(HierarchyPolicy::default_demotion_target(None), None);
    }

    #[test]
    fn test_valid_targets() {
        assert_eq!(
            HierarchyPolicy::valid_targets(Some(ChakraSenapoti), ChangeKind::Promote),
            &[MahaChakraSenapoti]
        );
        assert!(HierarchyPolicy::valid_targets(Some(UpaChakraSenapoti), ChangeKind::Demote).is_empty());
        assert!(HierarchyPolicy::valid_targets(Some(ChakraSenapoti), ChangeKind::Remove).is_empty());
        assert_eq!(HierarchyPolicy::valid_targets(None, ChangeKind::Promote).len(), 4);
    }

    #[test]
    fn test_validate_change_reports_reason() {
        let report = HierarchyPolicy::validate_change(
            Some(UpaChakraSenapoti),
            Some(MalaSenapoti),
            ChangeKind::Promote,
        );
        assert!(!report.is_valid());
        assert!(report.errors()[0].contains("UPA_CHAKRA_SENAPOTI"));
        assert!(report.errors()[0].contains("MALA_SENAPOTI"));

        let report = HierarchyPolicy::validate_change(None, None, ChangeKind::Remove);
        assert_eq!(report.errors().len(), 1);

        let report = HierarchyPolicy::validate_change(
            Some(ChakraSenapoti),
            Some(UpaChakraSenapoti),
            ChangeKind::Remove,
        );
        assert!(report.is_valid());
    }

    #[test]
    fn test_skipping_demotion_warns() {
        let report = HierarchyPolicy::validate_change(
            Some(MahaChakraSenapoti),
            Some(UpaChakraSenapoti),
            ChangeKind::Demote,
        );
        assert!(report.is_valid());
        assert_eq!(report.warnings().len(), 1);

        let warnings = report.into_result().unwrap();
        assert!(warnings[0].contains("skips"));
    }

    #[test]
    fn test_into_result_carries_all_errors() {
        let mut report = ValidationReport::new();
        report.push_error("first");
        report.push_error("second");

        match report.into_result() {
            Err(HierarchyError::Validation(errors)) => assert_eq!(errors, vec!["first", "second"]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
