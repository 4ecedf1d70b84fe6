//! # Lifecycle Flows
//!
//! Register, transfer, split, merge and verify driven end to end through the
//! service, checking records, history and published events together.
//!
//! ## Flows Tested:
//!
//! 1. **Provenance chain**: register → transfer → split, ownership follows the batch
//! 2. **Consolidation**: two matching registrations merged into one
//! 3. **Compliance**: verifier attaches a certification, outsiders are refused
//! 4. **Audit trail**: history references resolve to principals and batches

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use provenance_ledger::events::topics;
    use provenance_ledger::prelude::*;

    // =============================================================================
    // FLOW 1: PROVENANCE CHAIN
    // =============================================================================

    #[test]
    fn test_register_transfer_split_chain() {
        init_tracing();
        let h = Harness::new();
        let x = ALICE;

        let id = h
            .service
            .register_batch(
                at(ADMIN),
                BatchDraft::new(100, "Forest XYZ", 123_456).with_certification("CertA"),
            )
            .unwrap();
        assert_eq!(id, BatchId(1));
        assert_eq!(h.service.get_batch_history(id).len(), 1);

        h.service.transfer_ownership(at(ADMIN), id, x).unwrap();
        assert_eq!(h.service.get_batch_details(id).unwrap().owner, x);
        assert_eq!(h.service.get_batch_history(id).len(), 2);

        let child = h.service.split_batch(at(x), id, 40).unwrap();
        assert_eq!(child, BatchId(2));

        let parent = h.service.get_batch_details(id).unwrap();
        let split = h.service.get_batch_details(child).unwrap();
        assert_eq!(parent.quantity, 60);
        assert_eq!(split.quantity, 40);
        assert_eq!(split.owner, x);
        assert_eq!(split.origin, "Forest XYZ");
        assert_eq!(split.harvest_date, 123_456);
        assert_eq!(split.certifications, vec!["CertA".to_string()]);
        assert_eq!(split.status, BatchStatus::Pending);

        assert_eq!(h.service.get_batch_history(id).len(), 3);
        assert_eq!(h.service.get_batch_history(child).len(), 1);
        assert_eq!(h.service.get_next_batch_id(), BatchId(3));
        assert!(h.service.check_invariants().is_valid());
    }

    #[test]
    fn test_previous_owner_loses_control() {
        let h = Harness::new();
        let id = h.register(10, "Farm", 1);
        h.service.transfer_ownership(at(ADMIN), id, ALICE).unwrap();

        assert_eq!(
            h.service.transfer_ownership(at(ADMIN), id, BOB),
            Err(LedgerError::NotOwner {
                batch_id: id,
                caller: ADMIN
            })
        );
        assert_eq!(
            h.service.split_batch(at(ADMIN), id, 1).unwrap_err().code(),
            ErrorCode::NotOwner
        );

        h.service.transfer_ownership(at(ALICE), id, BOB).unwrap();
        assert_eq!(h.service.get_batch_details(id).unwrap().owner, BOB);
    }

    // =============================================================================
    // FLOW 2: CONSOLIDATION
    // =============================================================================

    #[test]
    fn test_merge_matching_registrations() {
        let h = Harness::new();
        let first = h.register(100, "Forest XYZ", 123_456);
        let second = h.register(50, "Forest XYZ", 123_456);
        let before = h.service.get_batch_history(first).len();

        h.service.merge_batches(at(ADMIN), first, second).unwrap();

        assert_eq!(h.service.get_batch_details(first).unwrap().quantity, 150);
        assert!(h.service.get_batch_details(second).is_none());
        assert_eq!(h.service.get_batch_history(first).len(), before + 1);
        // The absorbed batch keeps its trail and its id is never handed out again.
        assert_eq!(h.service.get_batch_history(second).len(), 1);
        assert_eq!(h.service.get_next_batch_id(), BatchId(3));
    }

    #[test]
    fn test_split_then_merge_restores_quantity() {
        let h = Harness::new();
        let id = h.register(100, "Farm", 7);
        let child = h.service.split_batch(at(ADMIN), id, 25).unwrap();
        let grandchild = h.service.split_batch(at(ADMIN), child, 5).unwrap();
        assert_eq!(h.total_quantity(), 100);

        h.service.merge_batches(at(ADMIN), child, grandchild).unwrap();
        h.service.merge_batches(at(ADMIN), id, child).unwrap();

        assert_eq!(h.service.get_batch_details(id).unwrap().quantity, 100);
        assert_eq!(h.service.snapshot().batches().len(), 1);
        assert!(h.service.check_invariants().is_valid());
    }

    #[test]
    fn test_merge_refuses_mixed_provenance() {
        let h = Harness::new();
        let a = h.register(10, "Farm A", 1);
        let b = h.register(10, "Farm B", 1);
        let c = h.register(10, "Farm A", 2);

        assert_eq!(
            h.service.merge_batches(at(ADMIN), a, b),
            Err(LedgerError::MergeMismatch {
                left: a,
                right: b,
                field: "origin"
            })
        );
        assert_eq!(
            h.service.merge_batches(at(ADMIN), a, c),
            Err(LedgerError::MergeMismatch {
                left: a,
                right: c,
                field: "harvest_date"
            })
        );

        h.service
            .verify_compliance(at(ORACLE), c, BatchStatus::Verified, None)
            .unwrap();
        let d = h.register(10, "Farm A", 2);
        assert_eq!(
            h.service.merge_batches(at(ADMIN), c, d).unwrap_err().code(),
            ErrorCode::MergeMismatch
        );
        assert_eq!(h.total_quantity(), 40);
    }

    // =============================================================================
    // FLOW 3: COMPLIANCE
    // =============================================================================

    #[test]
    fn test_verifier_attaches_certification() {
        let h = Harness::new();
        let id = h
            .service
            .register_batch(
                at(ADMIN),
                BatchDraft::new(100, "Forest XYZ", 123_456).with_certification("CertA"),
            )
            .unwrap();

        h.service
            .verify_compliance(at(ORACLE), id, BatchStatus::Verified, Some("NewCert".into()))
            .unwrap();

        let batch = h.service.get_batch_details(id).unwrap();
        assert_eq!(batch.status, BatchStatus::Verified);
        assert_eq!(batch.certifications, vec!["CertA".to_string(), "NewCert".to_string()]);
        assert_eq!(h.service.get_batch_history(id).len(), 2);
    }

    #[test]
    fn test_non_verifier_changes_nothing() {
        let h = Harness::new();
        let id = h.register(100, "Forest XYZ", 123_456);
        let before = h.service.snapshot();
        let published = h.events.len();

        for caller in [ADMIN, ALICE, MALLORY] {
            let err = h
                .service
                .verify_compliance(at(caller), id, BatchStatus::Verified, Some("NewCert".into()))
                .unwrap_err();
            assert_eq!(err, LedgerError::OracleOnly { caller });
            assert_eq!(err.category(), ErrorCategory::Authorization);
        }

        assert_eq!(h.service.snapshot(), before);
        assert_eq!(h.events.len(), published);
        assert_eq!(h.service.stats().rejected_operations, 3);
    }

    #[test]
    fn test_invalidated_batch_is_frozen_for_transfer() {
        let h = Harness::new();
        let id = h.register(10, "Farm", 1);
        h.service
            .verify_compliance(at(ORACLE), id, BatchStatus::Invalid, None)
            .unwrap();

        assert_eq!(
            h.service.transfer_ownership(at(ADMIN), id, ALICE),
            Err(LedgerError::BatchInvalidated(id))
        );

        // Re-verification lifts the freeze.
        h.service
            .verify_compliance(at(ORACLE), id, BatchStatus::Verified, None)
            .unwrap();
        h.service.transfer_ownership(at(ADMIN), id, ALICE).unwrap();
    }

    #[test]
    fn test_verify_rejects_non_terminal_targets() {
        let h = Harness::new();
        let id = h.register(10, "Farm", 1);
        for status in [BatchStatus::Pending, BatchStatus::Harvested] {
            assert_eq!(
                h.service.verify_compliance(at(ORACLE), id, status, None),
                Err(LedgerError::InvalidStatusTarget(status))
            );
        }
        assert_eq!(
            h.service.get_batch_details(id).unwrap().status,
            BatchStatus::Pending
        );
    }

    // =============================================================================
    // FLOW 4: AUDIT TRAIL
    // =============================================================================

    #[test]
    fn test_history_references() {
        let h = Harness::new();
        let id = h.register(100, "Farm", 1);
        h.service.transfer_ownership(at(ADMIN), id, ALICE).unwrap();
        let child = h.service.split_batch(at(ALICE), id, 30).unwrap();
        h.service
            .verify_compliance(at(ORACLE), child, BatchStatus::Verified, None)
            .unwrap();

        let parent_trail = h.service.get_batch_history(id);
        let actions: Vec<HistoryAction> = parent_trail.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                HistoryAction::Registered,
                HistoryAction::Transferred,
                HistoryAction::Split
            ]
        );
        assert_eq!(parent_trail[0].to, Some(HistoryRef::Principal(ADMIN)));
        assert_eq!(parent_trail[1].from, Some(HistoryRef::Principal(ADMIN)));
        assert_eq!(parent_trail[1].to, Some(HistoryRef::Principal(ALICE)));
        assert_eq!(parent_trail[2].to, Some(HistoryRef::Batch(child)));

        let child_trail = h.service.get_batch_history(child);
        assert_eq!(child_trail[0].action, HistoryAction::CreatedFromSplit);
        assert_eq!(child_trail[0].from, Some(HistoryRef::Batch(id)));
        assert_eq!(child_trail[0].to, Some(HistoryRef::Principal(ALICE)));
        assert_eq!(child_trail[1].action, HistoryAction::Verified);
        assert!(child_trail.iter().all(|e| e.timestamp == 100));
    }

    #[test]
    fn test_unknown_ids_read_empty() {
        let h = Harness::new();
        assert!(h.service.get_batch_details(BatchId(1)).is_none());
        assert!(h.service.get_batch_history(BatchId(99)).is_empty());
        assert!(h.service.get_batch_history(BatchId(0)).is_empty());
    }

    #[test]
    fn test_events_follow_commits() {
        let h = Harness::new();
        let id = h.register(100, "Farm", 1);
        let child = h.service.split_batch(at(ADMIN), id, 40).unwrap();
        let _ = h.service.split_batch(at(ADMIN), id, 0);
        h.service.merge_batches(at(ADMIN), id, child).unwrap();

        let published = h.events.published();
        let seen: Vec<&str> = published.iter().map(|e| e.event.topic()).collect();
        assert_eq!(
            seen,
            vec![topics::BATCH_REGISTERED, topics::BATCH_SPLIT, topics::BATCH_MERGED]
        );
        assert_eq!(
            published[1].event,
            LedgerEvent::BatchSplit {
                source: id,
                new_batch: child,
                split_quantity: 40,
                remaining: 60,
            }
        );

        let json: serde_json::Value =
            serde_json::from_str(&published[2].to_json().unwrap()).unwrap();
        assert_eq!(json["event"]["type"], "batches_merged");
        assert_eq!(json["event"]["quantity"], 100);
    }
}
