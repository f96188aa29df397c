//! Embedding backend trait.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into fixed-dimension vectors for similarity search.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embed a batch of texts. The output length and order match the
    /// input; every vector has `dimension()` components.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
