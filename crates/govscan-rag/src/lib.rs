//! Document loading/chunking, the vector store façade, and the compliance
//! retriever that sits between a vulnerability and a generation prompt.

pub mod embedder;
pub mod error;
pub mod loader;
pub mod retriever;
pub mod store;

pub use embedder::{cosine_similarity, Embedder, HashingEmbedder};
pub use error::RetrievalError;
pub use retriever::{ComplianceRetriever, RetrievalResult, DEFAULT_TOP_K, NO_EVIDENCE_MARKER};
pub use store::{JsonVectorStore, VectorStore};
