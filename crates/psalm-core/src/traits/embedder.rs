use crate::errors::PsalmResult;

/// Text-to-vector capability. Blocking; bounded by the implementation's timeout.
pub trait IEmbedder: Send + Sync {
    /// Embed a single non-empty text.
    fn embed(&self, text: &str) -> PsalmResult<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    fn embed_batch(&self, texts: &[String]) -> PsalmResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Model name recorded in the index header.
    fn model_name(&self) -> &str;

    /// Declared dimensionality, when known before the first call.
    fn dimensions(&self) -> Option<usize>;
}
