/// A single input file failed to decode or dispatch to a known dialect.
/// Fatal for that file only — the caller substitutes an empty finding list
/// and emits a warning progress event; the run continues.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
}
