//! JSON-sharded, file-backed vector store façade.
//!
//! One shard file per framework under the store directory, each holding an
//! ordered list of `{chunk, embedding}` records, the same hash-prefixed
//! cache-storage shape used elsewhere in this codebase but keyed by
//! framework instead of a content hash. `upsert` rewrites the owning shard
//! in place; `reset` truncates all shards. Persistence survives process
//! restarts by construction — it's just files on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use govscan_core::{ComplianceChunk, Framework, ScoredChunk};
use serde::{Deserialize, Serialize};

use crate::embedder::{cosine_similarity, Embedder};
use crate::error::RetrievalError;

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, chunks: Vec<ComplianceChunk>) -> Result<(), RetrievalError>;
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredChunk>, RetrievalError>;
    async fn count(&self) -> Result<usize, RetrievalError>;
    async fn reset(&self) -> Result<(), RetrievalError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ShardRecord {
    chunk: ComplianceChunk,
    embedding: Vec<f32>,
}

pub struct JsonVectorStore {
    dir: PathBuf,
    embedder: Arc<dyn Embedder>,
}

impl JsonVectorStore {
    pub fn new(dir: impl Into<PathBuf>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            dir: dir.into(),
            embedder,
        }
    }

    fn shard_path(&self, framework: Framework) -> PathBuf {
        self.dir.join(format!("{framework}.json"))
    }

    async fn read_shard(&self, path: &Path) -> Result<Vec<ShardRecord>, RetrievalError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| RetrievalError::RetrievalUnavailable(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(RetrievalError::RetrievalUnavailable(e.to_string())),
        }
    }

    async fn write_shard(&self, path: &Path, records: &[ShardRecord]) -> Result<(), RetrievalError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RetrievalError::RetrievalUnavailable(e.to_string()))?;
        }
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| RetrievalError::RetrievalUnavailable(e.to_string()))?;
        tokio::fs::write(path, body)
            .await
            .map_err(|e| RetrievalError::RetrievalUnavailable(e.to_string()))
    }

    async fn all_records(&self) -> Result<Vec<ShardRecord>, RetrievalError> {
        let mut all = Vec::new();
        for framework in Framework::all() {
            all.extend(self.read_shard(&self.shard_path(framework)).await?);
        }
        Ok(all)
    }
}

#[async_trait]
impl VectorStore for JsonVectorStore {
    async fn upsert(&self, chunks: Vec<ComplianceChunk>) -> Result<(), RetrievalError> {
        use std::collections::HashMap;
        let mut by_framework: HashMap<Framework, Vec<ComplianceChunk>> = HashMap::new();
        for chunk in chunks {
            by_framework.entry(chunk.framework).or_default().push(chunk);
        }

        for (framework, new_chunks) in by_framework {
            let path = self.shard_path(framework);
            let mut existing = self.read_shard(&path).await?;

            for chunk in new_chunks {
                let embedding = self.embedder.embed(&chunk.text);
                if let Some(slot) = existing.iter_mut().find(|r| r.chunk.id == chunk.id) {
                    slot.chunk = chunk;
                    slot.embedding = embedding;
                } else {
                    existing.push(ShardRecord { chunk, embedding });
                }
            }

            self.write_shard(&path, &existing).await?;
        }

        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredChunk>, RetrievalError> {
        let records = self.all_records().await?;
        let query_embedding = self.embedder.embed(text);

        let mut scored: Vec<ScoredChunk> = records
            .into_iter()
            .map(|r| ScoredChunk {
                score: cosine_similarity(&query_embedding, &r.embedding),
                chunk: r.chunk,
            })
            .collect();

        // Descending score, ties broken by chunk id ascending for a
        // deterministic, reproducible ordering.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });

        let capped = top_k.min(scored.len());
        scored.truncate(capped);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize, RetrievalError> {
        Ok(self.all_records().await?.len())
    }

    async fn reset(&self) -> Result<(), RetrievalError> {
        for framework in Framework::all() {
            self.write_shard(&self.shard_path(framework), &[]).await?;
        }
        Ok(())
    }
}
