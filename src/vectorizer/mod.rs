pub mod corpus;
pub mod item;
pub mod tfidf;
pub mod token;

use crate::utils::math::SparseVector;

/// Case-folded, deduplicated raw-frequency vector of labels (tags or categories)
/// Every distinct label gets a frequency of 1.
pub fn label_vector<T>(labels: &[T]) -> SparseVector<String>
where
    T: AsRef<str>,
{
    let mut keys: Vec<String> = labels.iter().map(|l| fold_label(l.as_ref())).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.into_iter().map(|k| (k, 1.0)).collect()
}

/// ラベルの正規化 (小文字化)
#[inline]
pub fn fold_label(label: &str) -> String {
    label.trim().to_lowercase()
}
