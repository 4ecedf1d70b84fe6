//! # Quantity Inflation
//!
//! Tries to create units through self-merges, degenerate splits and
//! overflowing merges.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use provenance_ledger::prelude::*;

    #[test]
    fn test_self_merge_does_not_double() {
        let h = Harness::new();
        let id = h.register(100, "Farm", 1);
        assert_eq!(
            h.service.merge_batches(at(ADMIN), id, id),
            Err(LedgerError::SelfMerge(id))
        );
        assert_eq!(h.service.get_batch_details(id).unwrap().quantity, 100);
    }

    #[test]
    fn test_degenerate_splits_rejected() {
        let h = Harness::new();
        let id = h.register(100, "Farm", 1);
        for requested in [0, 100, 101, u64::MAX] {
            assert_eq!(
                h.service.split_batch(at(ADMIN), id, requested),
                Err(LedgerError::SplitOutOfRange {
                    requested,
                    available: 100
                })
            );
        }
        assert_eq!(h.service.get_next_batch_id(), BatchId(2));
        assert_eq!(h.total_quantity(), 100);
    }

    #[test]
    fn test_single_unit_cannot_split() {
        let h = Harness::new();
        let id = h.register(1, "Farm", 1);
        assert!(h.service.split_batch(at(ADMIN), id, 1).is_err());
    }

    #[test]
    fn test_overflowing_merge_rejected() {
        let h = Harness::new();
        let a = h.register(u64::MAX, "Farm", 1);
        let b = h.register(1, "Farm", 1);
        let before = h.service.snapshot();

        assert_eq!(
            h.service.merge_batches(at(ADMIN), a, b),
            Err(LedgerError::QuantityOverflow {
                left: u64::MAX,
                right: 1
            })
        );
        assert_eq!(h.service.snapshot(), before);
    }

    #[test]
    fn test_zero_quantity_registration_rejected() {
        let h = Harness::new();
        let err = h
            .service
            .register_batch(at(ADMIN), BatchDraft::new(0, "Farm", 1))
            .unwrap_err();
        assert_eq!(err, LedgerError::ZeroQuantity);
        assert_eq!(err.code(), ErrorCode::InsufficientQuantity);
    }
}
