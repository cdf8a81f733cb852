//! Transaction Atomicity Tests
//!
//! A mutation either commits every node write and audit row it produced,
//! or none of them:
//! - Rule violations are reported before the first write
//! - A journal failure at commit discards staged writes
//! - Committed rows reach the journal in commit order

use std::sync::Arc;

use namhatta::hierarchy::{
    DemoteRequest, DevoteeId, DevoteeNode, HierarchyError, LeadershipRole, RoleTransitionEngine,
    TransferSubordinatesRequest,
};
use namhatta::observability::{read_journal, AuditJournal, FileAuditJournal, MemoryAuditJournal};
use namhatta::store::{DevoteeReader, Directory, DirectorySeed, MemoryDirectory, StoreError};
use tempfile::TempDir;

const ACTOR: DevoteeId = 900;

fn nodes() -> Vec<DevoteeNode> {
    vec![
        DevoteeNode::new(1, "M").with_role(LeadershipRole::MahaChakraSenapoti),
        DevoteeNode::new(2, "B")
            .with_role(LeadershipRole::ChakraSenapoti)
            .with_supervisor(1),
        DevoteeNode::new(3, "C")
            .with_role(LeadershipRole::ChakraSenapoti)
            .with_supervisor(1),
        DevoteeNode::new(4, "D")
            .with_role(LeadershipRole::UpaChakraSenapoti)
            .with_supervisor(2),
        DevoteeNode::new(5, "E")
            .with_role(LeadershipRole::UpaChakraSenapoti)
            .with_supervisor(2),
        DevoteeNode::new(6, "member"),
    ]
}

fn snapshot(dir: &MemoryDirectory) -> Vec<DevoteeNode> {
    dir.read(|view| view.find_all()).unwrap()
}

// =============================================================================
// Rejections write nothing
// =============================================================================

/// A batch with one bad id moves none of the good ones.
#[test]
fn test_transfer_with_foreign_id_writes_nothing() {
    let dir = Arc::new(DirectorySeed::from_nodes(nodes()).into_directory(None).unwrap());
    let engine = RoleTransitionEngine::new(Arc::clone(&dir));
    let before = snapshot(&dir);

    // 3 reports to 1, not 2
    let request = TransferSubordinatesRequest::new(2, Some(3), vec![4, 3]).reason("rebalance");
    let err = engine.transfer_subordinates(&request, ACTOR).unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(snapshot(&dir), before);
    assert_eq!(dir.history_len(), 0);
}

/// Every violated rule is reported, not just the first.
#[test]
fn test_transfer_collects_all_violations() {
    let dir = Arc::new(DirectorySeed::from_nodes(nodes()).into_directory(None).unwrap());
    let engine = RoleTransitionEngine::new(Arc::clone(&dir));

    let request = TransferSubordinatesRequest::new(2, Some(6), vec![4, 4, 99]);
    let err = engine.transfer_subordinates(&request, ACTOR).unwrap_err();

    // blank reason, duplicate 4, missing 99, non-leader target 6
    assert_eq!(err.violations().len(), 4);
    assert_eq!(dir.history_len(), 0);
}

/// A cascade into a non-leader fails the whole demotion.
#[test]
fn test_demote_cascade_into_member_writes_nothing() {
    let dir = Arc::new(DirectorySeed::from_nodes(nodes()).into_directory(None).unwrap());
    let engine = RoleTransitionEngine::new(Arc::clone(&dir));
    let before = snapshot(&dir);

    let request = DemoteRequest::new(2).supervisor(6).reason("underperformance");
    let err = engine.demote(&request, ACTOR).unwrap_err();

    assert!(matches!(err, HierarchyError::Validation(_)));
    assert_eq!(snapshot(&dir), before);
    assert_eq!(dir.history_len(), 0);
}

// =============================================================================
// Journal failures roll back
// =============================================================================

/// Staged node writes are discarded when the journal refuses the batch.
#[test]
fn test_journal_failure_rolls_back_cascade() {
    let journal = Arc::new(MemoryAuditJournal::failing());
    let sink: Arc<dyn AuditJournal> = journal.clone();
    let dir = Arc::new(
        DirectorySeed::from_nodes(nodes())
            .into_directory(Some(sink))
            .unwrap(),
    );
    let engine = RoleTransitionEngine::new(Arc::clone(&dir));
    let before = snapshot(&dir);

    let request = DemoteRequest::new(2).supervisor(3).reason("underperformance");
    let err = engine.demote(&request, ACTOR).unwrap_err();

    assert!(matches!(err, HierarchyError::Storage(StoreError::Journal(_))));
    assert_eq!(err.status_code(), 500);
    assert_eq!(snapshot(&dir), before);
    assert_eq!(dir.history_len(), 0);
    assert!(journal.is_empty());

    let metrics = engine.metrics().snapshot();
    assert_eq!(metrics.mutations_failed, 1);
    assert_eq!(metrics.demotions, 0);
}

// =============================================================================
// Journal contents
// =============================================================================

/// Committed rows are mirrored to the file journal in commit order.
#[test]
fn test_file_journal_mirrors_commits() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("history.log");
    let journal: Arc<dyn AuditJournal> = Arc::new(FileAuditJournal::open(&path).unwrap());
    let dir = Arc::new(
        DirectorySeed::from_nodes(nodes())
            .into_directory(Some(journal))
            .unwrap(),
    );
    let engine = RoleTransitionEngine::new(Arc::clone(&dir));

    let request = DemoteRequest::new(2).supervisor(3).reason("underperformance");
    engine.demote(&request, ACTOR).unwrap();

    let records = read_journal(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].devotee_id(), 4);
    assert_eq!(records[1].devotee_id(), 5);
    assert_eq!(records[2].devotee_id(), 2);
    assert!(records.iter().all(|r| r.changed_by() == ACTOR));
    assert_eq!(dir.history_len(), records.len());
}
