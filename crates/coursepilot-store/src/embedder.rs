//! Embedding backends.

use async_trait::async_trait;
use std::hash::{Hash, Hasher};

use coursepilot_core::config::StoreConfig;
use coursepilot_core::error::{CoursePilotError, Result};
use coursepilot_core::traits::Embedder;

/// Create an embedder from configuration.
pub fn create_embedder(config: &StoreConfig) -> Result<Box<dyn Embedder>> {
    match config.embedding_provider.as_str() {
        "hash" => Ok(Box::new(HashEmbedder::new(config.embedding_dim))),
        "openai" => Ok(Box::new(OpenAiEmbedder::new(config)?)),
        other => Err(CoursePilotError::Config(format!(
            "Unknown embedding provider '{other}' (expected 'hash' or 'openai')"
        ))),
    }
}

// ── Local feature-hashing embedder ─────────────────────────

/// Deterministic local embedder: hashes word unigrams and character
/// trigrams into a fixed number of buckets, then L2-normalizes.
///
/// Trigrams give the fuzzy behavior course-name resolution relies on —
/// "Intro" shares trigrams with "Introduction" even though the words
/// differ. Not a semantic model, but deterministic, dependency-free,
/// and good enough for keyword-heavy course material.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            self.bump(&mut vector, word);
            let chars: Vec<char> = word.chars().collect();
            for gram in chars.windows(3) {
                let gram: String = gram.iter().collect();
                self.bump(&mut vector, &gram);
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    fn bump(&self, vector: &mut [f32], token: &str) {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        token.hash(&mut hasher);
        let h = hasher.finish();
        let bucket = (h % self.dimension as u64) as usize;
        // One hash bit picks the sign, which keeps unrelated collisions
        // from always reinforcing each other.
        let sign = if h & (1 << 63) == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

// ── OpenAI-compatible embeddings API ───────────────────────

/// Client for any OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbedder {
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
}

impl OpenAiEmbedder {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let base_url = if config.embedding_endpoint.is_empty() {
            "https://api.openai.com/v1".to_string()
        } else {
            config.embedding_endpoint.trim_end_matches('/').to_string()
        };
        Ok(Self {
            api_key,
            base_url,
            model: config.embedding_model.clone(),
            dimension: config.embedding_dim,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.api_key.is_empty() {
            return Err(CoursePilotError::ApiKeyMissing("openai".into()));
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
            "dimensions": self.dimension,
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoursePilotError::Http(format!("embeddings request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CoursePilotError::Embedding(format!(
                "embeddings API error {status}: {text}"
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CoursePilotError::Http(e.to_string()))?;

        let vectors = json["data"]
            .as_array()
            .ok_or_else(|| CoursePilotError::Embedding("No data in embeddings response".into()))?
            .iter()
            .map(|item| {
                item["embedding"]
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_f64().map(|f| f as f32))
                            .collect::<Vec<f32>>()
                    })
                    .ok_or_else(|| {
                        CoursePilotError::Embedding("Malformed embedding in response".into())
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        if vectors.len() != texts.len() {
            return Err(CoursePilotError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

/// Cosine similarity between two vectors of the same dimension.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_embedder_deterministic() {
        let embedder = HashEmbedder::new(128);
        let a = embedder.embed(&["machine learning".into()]).await.unwrap();
        let b = embedder.embed(&["machine learning".into()]).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_hash_embedder_dimension() {
        let embedder = HashEmbedder::new(64);
        let out = embedder.embed(&["hello world".into()]).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 64);
    }

    #[tokio::test]
    async fn test_hash_embedder_normalized() {
        let embedder = HashEmbedder::new(256);
        let out = embedder.embed(&["neural networks and backprop".into()]).await.unwrap();
        let norm: f32 = out[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_prefix_shares_similarity_with_full_word() {
        let embedder = HashEmbedder::new(384);
        let vecs = embedder
            .embed(&[
                "Intro".into(),
                "Introduction to Machine Learning".into(),
                "Advanced Databases".into(),
            ])
            .await
            .unwrap();
        let to_full = cosine_similarity(&vecs[0], &vecs[1]);
        let to_other = cosine_similarity(&vecs[0], &vecs[2]);
        assert!(
            to_full > to_other,
            "'Intro' should sit closer to 'Introduction...' ({to_full}) than to 'Advanced Databases' ({to_other})"
        );
        assert!(to_full > 0.1);
    }

    #[test]
    fn test_cosine_similarity_identity_and_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_create_embedder_unknown_provider() {
        let mut config = StoreConfig::default();
        config.embedding_provider = "word2vec".into();
        assert!(create_embedder(&config).is_err());
    }

    #[test]
    fn test_create_embedder_hash() {
        let config = StoreConfig::default();
        let embedder = create_embedder(&config).unwrap();
        assert_eq!(embedder.name(), "hash");
        assert_eq!(embedder.dimension(), 384);
    }
}
