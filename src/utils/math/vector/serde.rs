use std::fmt;
use std::marker::PhantomData;

use num::Float;
use serde::de::{Error, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SparseVector;

impl<K, N> Serialize for SparseVector<K, N>
where
    K: Serialize,
    N: Float + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // entries: (key, value) の列としてキー昇順に出力する
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

impl<'de, K, N> Deserialize<'de> for SparseVector<K, N>
where
    K: Ord + Deserialize<'de>,
    N: Float + Deserialize<'de>,
{
    /// Entries may arrive in any order; duplicate keys are rejected.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<K, N>(PhantomData<(K, N)>);

        impl<'de, K, N> Visitor<'de> for EntriesVisitor<K, N>
        where
            K: Ord + Deserialize<'de>,
            N: Float + Deserialize<'de>,
        {
            type Value = Vec<(K, N)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a sequence of (key, value) pairs")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element::<(K, N)>()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        let mut entries = deserializer.deserialize_seq(EntriesVisitor::<K, N>(PhantomData))?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if entries.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(D::Error::custom("duplicate key in sparse vector"));
        }
        Ok(SparseVector::from_sorted(entries))
    }
}
