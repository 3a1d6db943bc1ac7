//! Property-Based Tests for Device Synthesis
//!
//! # Test Properties
//!
//! 1. **Determinism**: same seed and count always produce the same bytes
//! 2. **Uniqueness**: derived identifiers are pairwise distinct
//! 3. **Count Fidelity**: a set of `n` devices for every `n >= 0`
//! 4. **Naming**: device `i` is `gpu-{i}` with `index = i`

#![cfg(test)]

use std::collections::HashSet;

use proptest::prelude::*;

use super::identity::{derive, IDENTIFIER_PREFIX};
use super::synthesizer::{synthesize, ATTR_INDEX, ATTR_UUID};
use crate::device::AttributeValue;
use crate::error::ErrorKind;

// =============================================================================
// Property Strategies
// =============================================================================

/// Arbitrary seeds, including empty and non-ASCII strings.
fn seed_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z0-9-]{1,63}",
        any::<String>(),
    ]
}

fn count_strategy() -> impl Strategy<Value = i64> {
    0i64..64
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: synthesizing twice yields byte-identical output.
    #[test]
    fn prop_synthesis_is_deterministic(seed in seed_strategy(), n in count_strategy()) {
        let a = serde_json::to_vec(&synthesize(&seed, n)?).unwrap();
        let b = serde_json::to_vec(&synthesize(&seed, n)?).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: identifiers never repeat within one derivation.
    #[test]
    fn prop_identifiers_are_unique(seed in seed_strategy(), n in 0usize..256) {
        let ids = derive(&seed, n);
        prop_assert_eq!(ids.len(), n);

        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), n);
        prop_assert!(ids.iter().all(|id| id.starts_with(IDENTIFIER_PREFIX)));
    }

    /// Property: the set holds exactly `n` devices.
    #[test]
    fn prop_count_fidelity(seed in seed_strategy(), n in count_strategy()) {
        let devices = synthesize(&seed, n)?;
        prop_assert_eq!(devices.len() as i64, n);
    }

    /// Property: names and indices follow the ordinal, uuids follow derive().
    #[test]
    fn prop_naming_scheme(seed in seed_strategy(), n in count_strategy()) {
        let devices = synthesize(&seed, n)?;
        let uuids = derive(&seed, n as usize);

        for i in 0..n {
            let device = devices.get(&format!("gpu-{}", i));
            prop_assert!(device.is_some());
            let device = device.unwrap();
            prop_assert_eq!(device.attribute(ATTR_INDEX), Some(&AttributeValue::Int(i)));
            prop_assert_eq!(
                device.attribute(ATTR_UUID),
                Some(&AttributeValue::String(uuids[i as usize].clone()))
            );
        }
    }

    /// Property: every negative count is rejected.
    #[test]
    fn prop_negative_count_rejected(seed in seed_strategy(), n in i64::MIN..0) {
        let err = synthesize(&seed, n).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
