use std::ops::Index;

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

/// Small dense vector of fixed dimension
///
/// Only holds per-query score tuples `[term, tag, category, host, distance]`
/// and the global weight vector, hence the default of 5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedVector<const D: usize = 5> {
    values: [f64; D],
}

impl<const D: usize> FixedVector<D> {
    #[inline]
    pub const fn new(values: [f64; D]) -> Self {
        FixedVector { values }
    }

    #[inline]
    pub const fn zero() -> Self {
        FixedVector { values: [0.0; D] }
    }

    #[inline]
    pub fn as_array(&self) -> &[f64; D] {
        &self.values
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut values = self.values;
        values
            .iter_mut()
            .zip(other.values.iter())
            .for_each(|(a, b)| *a += b);
        FixedVector { values }
    }

    pub fn multiply(&self, scalar: f64) -> Self {
        FixedVector {
            values: self.values.map(|v| v * scalar),
        }
    }

    /// Zero maps to itself
    pub fn normalised(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return *self;
        }
        self.multiply(1.0 / len)
    }
}

impl<const D: usize> Default for FixedVector<D> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const D: usize> From<[f64; D]> for FixedVector<D> {
    fn from(values: [f64; D]) -> Self {
        FixedVector { values }
    }
}

impl<const D: usize> Index<usize> for FixedVector<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

/// serde は任意長の配列を直接扱えないので列として変換する
impl<const D: usize> Serialize for FixedVector<D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.values.iter())
    }
}

impl<'de, const D: usize> Deserialize<'de> for FixedVector<D> {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let values = Vec::<f64>::deserialize(deserializer)?;
        let len = values.len();
        let values: [f64; D] = values
            .try_into()
            .map_err(|_| De::Error::custom(format!("expected {} components, got {}", D, len)))?;
        Ok(FixedVector { values })
    }
}
