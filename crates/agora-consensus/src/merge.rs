//! The pure validator-set merge.

use crate::validator::{PendingUpdate, ValidatorRecord};

/// Merges pending updates into a copy of the current set.
///
/// For each update in submission order: a record with the same public key is
/// overwritten in place (position preserved), an unknown key is appended.
/// Returns the merged set plus the original pending list verbatim as the
/// delta to report. The delta is never summarized: if one batch carries the
/// same key twice, both entries appear in the delta and the later one wins
/// in the merged set.
pub fn merge_validator_updates(
    current: &[ValidatorRecord],
    pending: &[PendingUpdate],
) -> (Vec<ValidatorRecord>, Vec<PendingUpdate>) {
    let mut merged = current.to_vec();

    for update in pending {
        match merged.iter_mut().find(|r| r.pubkey == update.pubkey) {
            Some(slot) => slot.power = update.power,
            None => merged.push(ValidatorRecord::new(update.pubkey.clone(), update.power)),
        }
    }

    (merged, pending.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::PublicKeyBytes;
    use proptest::prelude::*;

    fn key(byte: u8) -> PublicKeyBytes {
        PublicKeyBytes::from_bytes(&[byte; 32])
    }

    fn set(entries: &[(u8, i64)]) -> Vec<ValidatorRecord> {
        entries
            .iter()
            .map(|(b, p)| ValidatorRecord::new(key(*b), *p))
            .collect()
    }

    fn updates(entries: &[(u8, i64)]) -> Vec<PendingUpdate> {
        entries
            .iter()
            .map(|(b, p)| PendingUpdate::new(key(*b), *p))
            .collect()
    }

    #[test]
    fn test_overwrite_preserves_position() {
        let current = set(&[(1, 10), (2, 20), (3, 30)]);
        let (merged, _) = merge_validator_updates(&current, &updates(&[(2, 99)]));

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].pubkey, key(2));
        assert_eq!(merged[1].power, 99);
        assert_eq!(merged[0].power, 10);
        assert_eq!(merged[2].power, 30);
    }

    #[test]
    fn test_unknown_keys_append_in_order() {
        let current = set(&[(1, 10)]);
        let (merged, _) = merge_validator_updates(&current, &updates(&[(5, 50), (4, 40)]));

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].pubkey, key(5));
        assert_eq!(merged[2].pubkey, key(4));
    }

    #[test]
    fn test_duplicate_key_last_wins_delta_verbatim() {
        let current = set(&[(1, 10)]);
        let pending = updates(&[(2, 5), (2, 7)]);
        let (merged, delta) = merge_validator_updates(&current, &pending);

        // Both duplicates survive in the delta, the later power in the set.
        assert_eq!(delta, pending);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].power, 7);
    }

    #[test]
    fn test_empty_pending_is_identity() {
        let current = set(&[(1, 10), (2, 20)]);
        let (merged, delta) = merge_validator_updates(&current, &[]);
        assert_eq!(merged, current);
        assert!(delta.is_empty());
    }

    proptest! {
        #[test]
        fn prop_merge_keeps_keys_unique_and_delta_verbatim(
            current_keys in proptest::collection::btree_set(0u8..16, 0..8),
            pending in proptest::collection::vec((0u8..16, -100i64..100), 0..12),
        ) {
            let current: Vec<ValidatorRecord> = current_keys
                .iter()
                .map(|b| ValidatorRecord::new(key(*b), 1))
                .collect();
            let pending = updates(&pending);

            let (merged, delta) = merge_validator_updates(&current, &pending);

            prop_assert_eq!(delta, pending.clone());

            // A unique-by-key input yields a unique-by-key output.
            let mut seen = std::collections::HashSet::new();
            for record in &merged {
                prop_assert!(seen.insert(record.pubkey.clone()));
            }

            // Every update's key ends up in the merged set, with the last
            // submitted power for that key.
            for update in &pending {
                let last = pending
                    .iter()
                    .rev()
                    .find(|u| u.pubkey == update.pubkey)
                    .map(|u| u.power);
                let record = merged.iter().find(|r| r.pubkey == update.pubkey);
                prop_assert_eq!(record.map(|r| r.power), last);
            }
        }
    }
}
