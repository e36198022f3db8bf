pub mod math;
pub mod serde;

use std::fmt::{self, Debug};
use std::ops::Index;

use num::Float;

/// SparseVectorは明示的な (key, value) の組で表す疎ベクトルです
///
/// Entries are kept sorted ascending by key and keys are unique. Every binary
/// operation walks both operands once with two cursors, so it relies on this
/// ordering instead of hashing.
///
/// Zero values are legal entries and are never pruned.
///
/// # Examples
/// ```
/// use tf_idf_recommender::SparseVector;
/// let v: SparseVector<&str> = SparseVector::new(vec!["b", "a"], vec![2.0, 1.0]);
/// assert_eq!(v.keys().collect::<Vec<_>>(), vec![&"a", &"b"]);
/// assert_eq!(v.dot(&v), 5.0);
/// ```
#[derive(Clone, PartialEq)]
pub struct SparseVector<K, N = f64>
where
    N: Float,
{
    entries: Vec<(K, N)>,
}

impl<K, N> SparseVector<K, N>
where
    K: Ord,
    N: Float,
{
    /// Create a vector from parallel key and value sequences
    ///
    /// # Panics
    /// If `keys` and `values` differ in length.
    /// Duplicate keys are a caller error and are only checked in debug builds.
    pub fn new(keys: Vec<K>, values: Vec<N>) -> Self {
        assert_eq!(
            keys.len(),
            values.len(),
            "Key and value lengths must be equal."
        );
        keys.into_iter().zip(values).collect()
    }

    /// Empty (zero) vector
    #[inline]
    pub fn empty() -> Self {
        SparseVector { entries: Vec::new() }
    }

    /// 既にソート済みの entries から構築する (検証なし)
    #[inline]
    pub(crate) fn from_sorted(entries: Vec<(K, N)>) -> Self {
        debug_assert!(
            entries.windows(2).all(|w| w[0].0 < w[1].0),
            "entries must be strictly ascending by key"
        );
        SparseVector { entries }
    }

    /// Number of stored entries (including explicit zeros)
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored for `key`, if any
    #[inline]
    pub fn get(&self, key: &K) -> Option<N> {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|idx| self.entries[idx].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.binary_search_by(|(k, _)| k.cmp(key)).is_ok()
    }

    /// Iterate entries in ascending key order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, N)> + '_ {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    #[inline]
    pub fn as_slice(&self) -> &[(K, N)] {
        &self.entries
    }
}

impl<K, N> Default for SparseVector<K, N>
where
    K: Ord,
    N: Float,
{
    fn default() -> Self {
        Self::empty()
    }
}

/// Collect unsorted pairs; the result is sorted by key.
impl<K, N> FromIterator<(K, N)> for SparseVector<K, N>
where
    K: Ord,
    N: Float,
{
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut entries: Vec<(K, N)> = iter.into_iter().collect();
        // 同一キーは呼び出し側の誤り、安定ソートで順序だけ揃える
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self::from_sorted(entries)
    }
}

impl<K, N> Index<usize> for SparseVector<K, N>
where
    N: Float,
{
    type Output = (K, N);

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<K, N> Debug for SparseVector<K, N>
where
    K: Debug,
    N: Float + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}
