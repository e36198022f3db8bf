use std::cmp::Ordering;

use num::Float;

use super::SparseVector;

impl<K, N> SparseVector<K, N>
where
    K: Ord + Clone,
    N: Float,
{
    /// 二乗ノルム
    #[inline]
    pub fn sq_length(&self) -> N {
        self.entries
            .iter()
            .fold(N::zero(), |acc, (_, v)| acc + *v * *v)
    }

    #[inline]
    pub fn length(&self) -> N {
        self.sq_length().sqrt()
    }

    /// Scale to unit length
    ///
    /// The zero vector (or any vector whose entries are all zero) maps to
    /// itself instead of dividing by zero.
    pub fn normalised(&self) -> Self {
        let len = self.length();
        if len == N::zero() {
            return self.clone();
        }
        self.multiply(len.recip())
    }

    /// Elementwise scale, keys preserved
    pub fn multiply(&self, scalar: N) -> Self {
        Self::from_sorted(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), *v * scalar))
                .collect(),
        )
    }

    /// Union of keys, summing values present in both
    ///
    /// # Arguments
    /// * `other` - 他のベクトル
    ///
    /// # Returns
    /// * `SparseVector<K, N>` - ソート順を保った和
    pub fn add(&self, other: &Self) -> Self {
        let mut result = Vec::with_capacity(self.len() + other.len());
        let mut a_it = self.entries.iter().peekable();
        let mut b_it = other.entries.iter().peekable();

        while let (Some((ka, va)), Some((kb, vb))) = (a_it.peek(), b_it.peek()) {
            match ka.cmp(kb) {
                Ordering::Less => {
                    result.push((ka.clone(), *va));
                    a_it.next();
                }
                Ordering::Greater => {
                    result.push((kb.clone(), *vb));
                    b_it.next();
                }
                Ordering::Equal => {
                    result.push((ka.clone(), *va + *vb));
                    a_it.next();
                    b_it.next();
                }
            }
        }
        // 残り
        result.extend(a_it.map(|(k, v)| (k.clone(), *v)));
        result.extend(b_it.map(|(k, v)| (k.clone(), *v)));

        Self::from_sorted(result)
    }

    /// Elementwise (Hadamard) product over the intersection of keys
    ///
    /// Keys missing from either operand are absent from the result. This is not
    /// an outer product.
    pub fn cartesian_product(&self, other: &Self) -> Self {
        let mut result = Vec::with_capacity(self.len().min(other.len()));
        let mut i = 0;
        let mut j = 0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ka, va) = &self.entries[i];
            let (kb, vb) = &other.entries[j];
            match ka.cmp(kb) {
                Ordering::Equal => {
                    result.push((ka.clone(), *va * *vb));
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        Self::from_sorted(result)
    }

    /// ドット積
    /// Sum of products over intersecting keys.
    pub fn dot(&self, other: &Self) -> N {
        let mut result = N::zero();
        let mut i = 0;
        let mut j = 0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ka, va) = &self.entries[i];
            let (kb, vb) = &other.entries[j];
            match ka.cmp(kb) {
                Ordering::Equal => {
                    result = result + *va * *vb;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }
}
