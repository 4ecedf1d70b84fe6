//! # Governance Flows
//!
//! Pause switch, role rotation and capacity limits as seen by callers.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use provenance_ledger::errors::CapacityResource;
    use provenance_ledger::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_pause_freezes_every_mutation() {
        let h = Harness::new();
        let a = h.register(10, "Farm", 1);
        let b = h.register(10, "Farm", 1);
        h.governance.set_paused(true);
        let before = h.service.snapshot();

        let results = [
            h.service
                .register_batch(at(ADMIN), BatchDraft::new(1, "Farm", 1))
                .map(|_| ()),
            h.service.transfer_ownership(at(ADMIN), a, ALICE),
            h.service.split_batch(at(ADMIN), a, 1).map(|_| ()),
            h.service.merge_batches(at(ADMIN), a, b),
            h.service
                .verify_compliance(at(ORACLE), a, BatchStatus::Verified, None),
        ];
        for result in results {
            assert_eq!(result, Err(LedgerError::Paused));
        }
        assert_eq!(h.service.snapshot(), before);

        // Pause wins over every other check.
        assert_eq!(
            h.service.transfer_ownership(at(MALLORY), BatchId(99), Address::ZERO),
            Err(LedgerError::Paused)
        );

        h.governance.set_paused(false);
        h.service.merge_batches(at(ADMIN), a, b).unwrap();
    }

    #[test]
    fn test_verifier_rotation() {
        let h = Harness::new();
        let id = h.register(10, "Farm", 1);
        h.governance.set_verifier(BOB);

        assert_eq!(
            h.service
                .verify_compliance(at(ORACLE), id, BatchStatus::Verified, None),
            Err(LedgerError::OracleOnly { caller: ORACLE })
        );
        h.service
            .verify_compliance(at(BOB), id, BatchStatus::Verified, None)
            .unwrap();
    }

    #[test]
    fn test_unassigned_roles_admit_nobody() {
        let governance = Arc::new(InMemoryGovernance::new(Address::ZERO, Address::ZERO));
        let service = ProvenanceService::new(
            LedgerConfig::default(),
            governance,
            Arc::new(NoopEventSink),
        )
        .unwrap();

        assert_eq!(
            service.register_batch(
                CallContext::new(Address::ZERO, 1),
                BatchDraft::new(1, "Farm", 1)
            ),
            Err(LedgerError::NotAuthorized {
                caller: Address::ZERO
            })
        );
    }

    #[test]
    fn test_history_capacity_aborts_operation() {
        let limits = LedgerLimits {
            max_history_entries: 3,
            ..LedgerLimits::default()
        };
        let h = Harness::with_config(LedgerConfig::default().with_limits(limits));
        let id = h.register(100, "Farm", 1);
        h.service.transfer_ownership(at(ADMIN), id, ALICE).unwrap();
        h.service.transfer_ownership(at(ALICE), id, ADMIN).unwrap();
        let before = h.service.snapshot();

        // The split would append a fourth entry to the parent.
        assert_eq!(
            h.service.split_batch(at(ADMIN), id, 10),
            Err(LedgerError::CapacityExceeded {
                resource: CapacityResource::History,
                limit: 3
            })
        );
        assert_eq!(h.service.snapshot(), before);
        assert_eq!(h.service.get_next_batch_id(), BatchId(2));
    }

    #[test]
    fn test_certification_capacity() {
        let h = Harness::new();
        let mut draft = BatchDraft::new(10, "Farm", 1);
        for i in 0..10 {
            draft = draft.with_certification(format!("C{i}"));
        }
        let id = h.service.register_batch(at(ADMIN), draft.clone()).unwrap();

        assert_eq!(
            h.service
                .verify_compliance(at(ORACLE), id, BatchStatus::Verified, Some("C10".into()))
                .unwrap_err()
                .code(),
            ErrorCode::CapacityExceeded
        );
        // Status updates without a certification still go through.
        h.service
            .verify_compliance(at(ORACLE), id, BatchStatus::Verified, None)
            .unwrap();

        let too_many = draft.with_certification("C10");
        assert!(matches!(
            h.service.register_batch(at(ADMIN), too_many),
            Err(LedgerError::CapacityExceeded {
                resource: CapacityResource::Certifications,
                ..
            })
        ));
    }

    #[test]
    fn test_env_configured_limits() {
        let config = LedgerConfig::from_lookup(|key| match key {
            "PROVENANCE_MAX_ORIGIN_LEN" => Some("4".to_string()),
            _ => None,
        });
        let h = Harness::with_config(config);

        assert!(h
            .service
            .register_batch(at(ADMIN), BatchDraft::new(1, "Farm", 1))
            .is_ok());
        assert_eq!(
            h.service
                .register_batch(at(ADMIN), BatchDraft::new(1, "Farms", 1))
                .unwrap_err()
                .code(),
            ErrorCode::InvalidMetadata
        );
    }
}
