/// Reference or generated text fell below the 50-character floor after
/// trimming. No `ComparisonReport` is produced; the caller gets this
/// typed failure instead.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("text too short to compare (minimum 50 characters after trim)")]
    TooShort,
}
