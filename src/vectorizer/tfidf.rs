/// IDF calculation engine
///
/// `idf` must strictly decrease as `doc_freq` grows for a fixed corpus size and
/// must be defined for every `doc_freq >= 1`. A `doc_freq` of 0 means the term
/// is unknown to the corpus.
pub trait IdfEngine {
    /// # Arguments
    /// * `doc_freq` - 語を含む文書数
    /// * `doc_num` - コーパスの文書数
    fn idf(doc_freq: u64, doc_num: u64) -> f64;
}

/// デフォルトのIDFエンジン
/// `ln((doc_num + 1) / doc_freq)`, and `0.0` for unknown terms.
/// Positive for every `1 <= doc_freq <= doc_num`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdfEngine;

impl IdfEngine for DefaultIdfEngine {
    #[inline]
    fn idf(doc_freq: u64, doc_num: u64) -> f64 {
        if doc_freq == 0 {
            return 0.0;
        }
        ((doc_num as f64 + 1.0) / doc_freq as f64).ln()
    }
}
