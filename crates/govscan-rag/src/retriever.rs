//! Builds a retrieval query from a vulnerability, queries the vector store,
//! and formats the hits into a bounded context block for the prompt.

use std::sync::Arc;

use govscan_core::{ScoredChunk, Vulnerability, VulnKind};

use crate::error::RetrievalError;
use crate::store::VectorStore;

pub const DEFAULT_TOP_K: usize = 5;
pub const QUERY_MAX_LEN: usize = 512;
pub const SCORE_FLOOR: f32 = 0.5;
pub const CONTEXT_MAX_LEN: usize = 3000;
pub const EXCERPT_LEN: usize = 280;

pub const NO_EVIDENCE_MARKER: &str =
    "[NO FRAMEWORK EVIDENCE RETRIEVED] No relevant compliance framework excerpts were found for this finding. The policy below is generated from general best practice.";

/// Result of a retrieval pass: the hits used (empty when the default
/// template fired) and the formatted context block for the prompt.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub chunks: Vec<ScoredChunk>,
    pub formatted_context: String,
}

pub struct ComplianceRetriever {
    store: Arc<dyn VectorStore>,
}

impl ComplianceRetriever {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    pub async fn retrieve_for_vulnerability(
        &self,
        vuln: &Vulnerability,
        top_k: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        let query = build_query(vuln);
        let hits = self.store.query(&query, top_k).await?;

        let top_score = hits.first().map(|h| h.score).unwrap_or(0.0);
        if hits.is_empty() || top_score < SCORE_FLOOR {
            return Ok(RetrievalResult {
                chunks: Vec::new(),
                formatted_context: NO_EVIDENCE_MARKER.to_string(),
            });
        }

        let formatted_context = format_context(&hits);
        Ok(RetrievalResult {
            chunks: hits,
            formatted_context,
        })
    }
}

fn build_query(vuln: &Vulnerability) -> String {
    let mut parts = vec![
        vuln.title(),
        vuln.category().to_string(),
        vuln.description().to_string(),
    ];
    if let Some(cwe) = vuln.cwe_id() {
        parts.push(cwe.to_string());
    }
    if vuln.kind() == VulnKind::Sca {
        if let Vulnerability::Sca(f) = vuln {
            parts.push(f.package_name.clone());
        }
    }

    let joined = parts.join(" ");
    let normalized: String = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&normalized, QUERY_MAX_LEN)
}

fn format_context(hits: &[ScoredChunk]) -> String {
    use std::collections::BTreeMap;

    let mut by_framework: BTreeMap<String, Vec<&ScoredChunk>> = BTreeMap::new();
    for hit in hits {
        by_framework
            .entry(hit.chunk.framework.to_string())
            .or_default()
            .push(hit);
    }
    for group in by_framework.values_mut() {
        group.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    }

    let mut out = String::new();
    let mut n = 1;
    'outer: for group in by_framework.values() {
        for hit in group {
            let excerpt = truncate_chars(&hit.chunk.text, EXCERPT_LEN);
            let line = format!(
                "[{n}] {} {}: {} — {}\n",
                hit.chunk.framework, hit.chunk.control_id, hit.chunk.title, excerpt
            );
            if out.len() + line.len() > CONTEXT_MAX_LEN {
                break 'outer;
            }
            out.push_str(&line);
            n += 1;
        }
    }

    out
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govscan_core::{Confidence, SastFinding, Severity};
    use std::sync::Arc;

    fn sast() -> Vulnerability {
        Vulnerability::Sast(SastFinding {
            title: "SQL Injection".into(),
            severity: Severity::Critical,
            category: "SQL Injection".into(),
            file_path: "app/auth.py".into(),
            line_number: 45,
            cwe_id: Some("CWE-89".into()),
            description: "User input concatenated into SQL query".into(),
            recommendation: String::new(),
            confidence: Confidence::High,
            owasp_category: None,
            code_snippet: None,
            metadata: Default::default(),
        })
    }

    struct EmptyStore;
    #[async_trait::async_trait]
    impl VectorStore for EmptyStore {
        async fn upsert(&self, _chunks: Vec<govscan_core::ComplianceChunk>) -> Result<(), RetrievalError> {
            Ok(())
        }
        async fn query(&self, _text: &str, _top_k: usize) -> Result<Vec<ScoredChunk>, RetrievalError> {
            Ok(Vec::new())
        }
        async fn count(&self) -> Result<usize, RetrievalError> {
            Ok(0)
        }
        async fn reset(&self) -> Result<(), RetrievalError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn empty_store_returns_default_template() {
        let retriever = ComplianceRetriever::new(Arc::new(EmptyStore));
        let result = retriever.retrieve_for_vulnerability(&sast(), DEFAULT_TOP_K).await.unwrap();
        assert!(result.chunks.is_empty());
        assert!(result.formatted_context.starts_with("[NO FRAMEWORK EVIDENCE RETRIEVED]"));
    }

    #[test]
    fn query_includes_cwe_and_is_bounded() {
        let q = build_query(&sast());
        assert!(q.contains("CWE-89"));
        assert!(q.len() <= QUERY_MAX_LEN);
    }
}
