//! Directory seed
//!
//! Boot-time import of devotee nodes from a JSON file. The seed is the only
//! write path besides the hierarchy engine, so it is checked against the
//! forest invariants before anything is loaded:
//! - ids are unique
//! - every `reportingTo` names a node in the seed
//! - no node reports to itself, directly or transitively

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::memory::{DirectoryState, MemoryDirectory};
use crate::hierarchy::{CycleGuard, DevoteeNode};
use crate::observability::AuditJournal;

/// Seed file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySeed {
    pub devotees: Vec<DevoteeNode>,
}

impl DirectorySeed {
    pub fn from_nodes(devotees: Vec<DevoteeNode>) -> Self {
        Self { devotees }
    }

    /// Read a seed file. Does not validate.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::Seed(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| StoreError::Seed(format!("Invalid seed JSON: {}", e)))
    }

    /// Check the forest invariants, reporting the first violation.
    pub fn validate(&self) -> StoreResult<()> {
        let state = self.to_state()?;

        for node in &self.devotees {
            let Some(supervisor) = node.reporting_to else {
                continue;
            };
            if !state.devotees.contains_key(&supervisor) {
                return Err(StoreError::InvalidSeed(format!(
                    "devotee {} reports to unknown devotee {}",
                    node.id, supervisor
                )));
            }
            if CycleGuard::would_create_cycle(&state, node.id, supervisor)? {
                return Err(StoreError::InvalidSeed(format!(
                    "devotee {} is part of a reporting cycle",
                    node.id
                )));
            }
        }

        Ok(())
    }

    /// Validate and build a directory.
    pub fn into_directory(
        self,
        journal: Option<Arc<dyn AuditJournal>>,
    ) -> StoreResult<MemoryDirectory> {
        self.validate()?;
        let state = self.to_state()?;
        Ok(MemoryDirectory::from_state(state, journal))
    }

    fn to_state(&self) -> StoreResult<DirectoryState> {
        let mut seen = HashSet::new();
        let mut state = DirectoryState::default();
        for node in &self.devotees {
            if !seen.insert(node.id) {
                return Err(StoreError::DuplicateId(node.id));
            }
            state.devotees.insert(node.id, node.clone());
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::LeadershipRole;
    use crate::store::{Directory, DevoteeReader};
    use tempfile::tempdir;

    fn forest() -> Vec<DevoteeNode> {
        vec![
            DevoteeNode::new(1, "a").with_role(LeadershipRole::MalaSenapoti),
            DevoteeNode::new(2, "b")
                .with_role(LeadershipRole::MahaChakraSenapoti)
                .with_supervisor(1),
            DevoteeNode::new(3, "c").with_supervisor(2),
        ]
    }

    #[test]
    fn test_valid_seed_builds_directory() {
        let dir = DirectorySeed::from_nodes(forest()).into_directory(None).unwrap();
        assert_eq!(dir.len(), 3);
        let node = dir.read(|view| view.find_by_id(3)).unwrap().unwrap();
        assert_eq!(node.reporting_to, Some(2));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut nodes = forest();
        nodes.push(DevoteeNode::new(2, "dup"));
        let err = DirectorySeed::from_nodes(nodes).validate().unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(2)));
    }

    #[test]
    fn test_rejects_dangling_supervisor() {
        let mut nodes = forest();
        nodes.push(DevoteeNode::new(4, "d").with_supervisor(40));
        let err = DirectorySeed::from_nodes(nodes).validate().unwrap_err();
        assert!(err.to_string().contains("unknown devotee 40"));
    }

    #[test]
    fn test_rejects_cycles() {
        let nodes = vec![
            DevoteeNode::new(1, "a").with_supervisor(3),
            DevoteeNode::new(2, "b").with_supervisor(1),
            DevoteeNode::new(3, "c").with_supervisor(2),
        ];
        let err = DirectorySeed::from_nodes(nodes).validate().unwrap_err();
        assert!(matches!(err, StoreError::InvalidSeed(_)));

        let self_loop = vec![DevoteeNode::new(5, "e").with_supervisor(5)];
        assert!(DirectorySeed::from_nodes(self_loop).validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(
            &path,
            r#"{"devotees": [
                {"id": 1, "name": "a", "role": "MALA_SENAPOTI", "hasSystemAccess": true},
                {"id": 2, "name": "b", "role": "MAHA_CHAKRA_SENAPOTI", "reportingTo": 1}
            ]}"#,
        )
        .unwrap();

        let seed = DirectorySeed::load(&path).unwrap();
        assert_eq!(seed.devotees.len(), 2);
        assert!(seed.devotees[0].has_system_access);
        seed.validate().unwrap();
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, "not json").unwrap();

        let err = DirectorySeed::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid seed JSON"));
    }
}
