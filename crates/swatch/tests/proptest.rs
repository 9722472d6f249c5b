//! Property-based tests for scales, responsive values, merging and the LRU.

use proptest::prelude::*;
use swatch::{
    depth_first_object_merge, get_responsive_value, get_scale_value, LruCache, Scale, StyleSheet,
    Value,
};

// ============================================================================
// Strategies
// ============================================================================

fn slot() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        (0i32..100).prop_map(|n| Some(Value::from(n))),
    ]
}

fn responsive() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0i32..100).prop_map(Value::from),
        prop::collection::vec(slot(), 0..6).prop_map(Value::Array),
    ]
}

fn flat_sheet() -> impl Strategy<Value = StyleSheet> {
    prop::collection::vec(("[a-e]", 0i32..10), 0..5)
        .prop_map(|entries| entries.into_iter().collect::<StyleSheet>())
}

// ============================================================================
// Scales
// ============================================================================

proptest! {
    #[test]
    fn scale_lookup_is_always_a_member(
        values in prop::collection::vec(any::<i32>(), 1..10),
        offset in 0usize..12,
        position in any::<i64>(),
    ) {
        let scale = Scale::new(values.clone(), offset);
        let found = get_scale_value(&scale, position).unwrap();
        prop_assert!(values.contains(found));
    }

    #[test]
    fn scale_lookup_clamps_past_the_ends(
        values in prop::collection::vec(any::<i32>(), 1..10),
        offset in 0usize..10,
        beyond in 0i64..1000,
    ) {
        let offset = offset.min(values.len() - 1);
        let scale = Scale::new(values.clone(), offset);
        let top = (values.len() - 1 - offset) as i64 + beyond;
        let bottom = -(offset as i64) - beyond;
        prop_assert_eq!(get_scale_value(&scale, top), values.last());
        prop_assert_eq!(get_scale_value(&scale, bottom), values.first());
    }
}

// ============================================================================
// Responsive values
// ============================================================================

proptest! {
    #[test]
    fn responsive_selection_never_panics(
        breakpoint in 0usize..10,
        default in responsive(),
        new in proptest::option::of(responsive()),
    ) {
        let _ = get_responsive_value(breakpoint, Some(&default), new.as_ref());
    }

    #[test]
    fn defined_new_value_wins_at_its_breakpoint(
        breakpoint in 0usize..6,
        default in responsive(),
        n in 0i32..100,
    ) {
        let mut slots = vec![None; breakpoint];
        slots.push(Some(Value::from(n)));
        let new = Value::Array(slots);
        prop_assert_eq!(
            get_responsive_value(breakpoint, Some(&default), Some(&new)),
            Some(&Value::from(n))
        );
    }

    #[test]
    fn scalar_default_applies_everywhere(breakpoint in 0usize..20, n in 0i32..100) {
        let default = Value::from(n);
        prop_assert_eq!(get_responsive_value(breakpoint, Some(&default), None), Some(&default));
    }
}

// ============================================================================
// Merge
// ============================================================================

proptest! {
    #[test]
    fn merge_keeps_every_key_and_later_wins(a in flat_sheet(), b in flat_sheet(), c in flat_sheet()) {
        let merged = depth_first_object_merge(&[a.clone(), b.clone(), c.clone()]);
        for (key, value) in a.iter() {
            let expected = c.get(key).or_else(|| b.get(key)).unwrap_or(value);
            prop_assert_eq!(merged.get(key), Some(expected));
        }
        for sheet in [&b, &c] {
            for key in sheet.keys() {
                prop_assert!(merged.contains_key(key));
            }
        }
    }

    #[test]
    fn merge_of_one_is_identity(a in flat_sheet()) {
        prop_assert!(depth_first_object_merge(std::slice::from_ref(&a)).same(&a));
    }
}

// ============================================================================
// LRU
// ============================================================================

proptest! {
    #[test]
    fn lru_never_exceeds_capacity(
        max_size in 1usize..8,
        ops in prop::collection::vec((0u8..16, any::<bool>()), 0..64),
    ) {
        let mut cache = LruCache::new(max_size);
        for (key, is_set) in ops {
            if is_set {
                cache.set(key, key);
            } else {
                cache.get(&key);
            }
            prop_assert!(cache.size() <= max_size);
        }
    }

    #[test]
    fn most_recent_set_survives(max_size in 1usize..8, keys in prop::collection::vec(0u8..32, 1..40)) {
        let mut cache = LruCache::new(max_size);
        for key in &keys {
            cache.set(*key, ());
        }
        let last = keys.last().unwrap();
        prop_assert!(cache.has(last));
    }
}
