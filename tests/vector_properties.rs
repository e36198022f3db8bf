//! Property-based tests for the sparse vector algebra.
//!
//! Uses proptest to verify invariants across many random inputs.

use std::collections::BTreeSet;

use proptest::prelude::*;
use tf_idf_recommender::{ItemVector, SparseVector};

// ============================================================================
// Strategies
// ============================================================================

/// Random sparse vector over a small key space so operands overlap
fn sparse_vector() -> impl Strategy<Value = SparseVector<u8>> {
    prop::collection::btree_map(0u8..40, -100.0..100.0f64, 0..20)
        .prop_map(|entries| entries.into_iter().collect())
}

fn labelled_vector() -> impl Strategy<Value = SparseVector<String>> {
    prop::collection::btree_map("[a-f]{1,3}", 0.0..10.0f64, 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

fn item_vector() -> impl Strategy<Value = ItemVector> {
    (labelled_vector(), labelled_vector(), labelled_vector(), labelled_vector())
        .prop_map(|(term, tag, category, host)| ItemVector::new(term, tag, category, host))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

fn vectors_close<K: Ord + Clone>(a: &SparseVector<K>, b: &SparseVector<K>) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|((ka, va), (kb, vb))| ka == kb && close(va, vb))
}

// ============================================================================
// Algebra Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_self_dot_is_sq_length(v in sparse_vector()) {
        prop_assert_eq!(v.dot(&v), v.sq_length());
    }

    #[test]
    fn prop_normalised_has_unit_length(v in sparse_vector()) {
        prop_assume!(v.sq_length() > 1e-12);
        prop_assert!((v.normalised().length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_zero_vector_normalises_to_itself(keys in prop::collection::btree_set(0u8..40, 0..10)) {
        let zero: SparseVector<u8> = keys.into_iter().map(|k| (k, 0.0)).collect();
        prop_assert_eq!(zero.normalised(), zero);
    }

    #[test]
    fn prop_add_commutes(a in sparse_vector(), b in sparse_vector()) {
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn prop_add_associates(a in sparse_vector(), b in sparse_vector(), c in sparse_vector()) {
        prop_assert!(vectors_close(&a.add(&b).add(&c), &a.add(&b.add(&c))));
    }

    #[test]
    fn prop_dot_is_bilinear(a in sparse_vector(), b in sparse_vector(), c in -10.0..10.0f64) {
        prop_assert!(close(a.multiply(c).dot(&b), c * a.dot(&b)));
    }

    #[test]
    fn prop_cartesian_product_keys_are_intersection(a in sparse_vector(), b in sparse_vector()) {
        let keys: BTreeSet<u8> = a.cartesian_product(&b).keys().copied().collect();
        let expected: BTreeSet<u8> = a
            .keys()
            .copied()
            .collect::<BTreeSet<_>>()
            .intersection(&b.keys().copied().collect())
            .copied()
            .collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_results_stay_sorted(a in sparse_vector(), b in sparse_vector()) {
        for v in [a.add(&b), a.cartesian_product(&b)] {
            let keys: Vec<u8> = v.keys().copied().collect();
            prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_item_vector_add_commutes(a in item_vector(), b in item_vector()) {
        prop_assert_eq!(a.add(&b), b.add(&a));
    }

    #[test]
    fn prop_item_vector_add_associates(a in item_vector(), b in item_vector(), c in item_vector()) {
        let left = a.add(&b).add(&c);
        let right = a.add(&b.add(&c));
        prop_assert!(vectors_close(&left.term, &right.term));
        prop_assert!(vectors_close(&left.tag, &right.tag));
        prop_assert!(vectors_close(&left.category, &right.category));
        prop_assert!(vectors_close(&left.host, &right.host));
    }
}
