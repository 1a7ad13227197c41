//! Shared compliance data shapes. The catalogues themselves (the ordered
//! list of valid control ids per framework) live in `govscan-compliance`;
//! this crate only knows the shapes so the RAG layer doesn't need to depend
//! on the catalogue crate.

use serde::{Deserialize, Serialize};

/// A compliance framework this pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Framework {
    NistCsf,
    Iso27001,
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Framework::NistCsf => "NIST_CSF",
            Framework::Iso27001 => "ISO_27001",
        };
        write!(f, "{s}")
    }
}

impl Framework {
    pub fn all() -> [Framework; 2] {
        [Framework::NistCsf, Framework::Iso27001]
    }
}

/// One retrievable slice of a compliance document.
///
/// `id` is unique; `(framework, control_id)` is not — a control may be
/// chunked across several rows when its source text spans multiple
/// paragraphs or numbered subsections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceChunk {
    pub id: String,
    pub framework: Framework,
    pub control_id: String,
    pub title: String,
    pub text: String,
    pub metadata: super::vulnerability::Metadata,
}

impl ComplianceChunk {
    pub fn new(
        id: impl Into<String>,
        framework: Framework,
        control_id: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            framework,
            control_id: control_id.into(),
            title: title.into(),
            text: text.into(),
            metadata: super::vulnerability::Metadata::new(),
        }
    }
}

/// A chunk paired with its similarity score against some query, as returned
/// by the vector store façade's `query` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: ComplianceChunk,
    pub score: f32,
}
