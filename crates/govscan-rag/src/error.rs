/// The vector store or its embedding backend failed. Propagation: the
/// retriever substitutes an empty context and continues generation with a
/// warning, never aborting the run.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("retrieval backend unavailable: {0}")]
    RetrievalUnavailable(String),
}
