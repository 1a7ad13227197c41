//! Core data model shared by every other crate in the workspace: canonical
//! severity, the discriminated vulnerability union, compliance chunk
//! shapes, per-run results, and progress events.

pub mod compliance;
pub mod policy;
pub mod progress;
pub mod severity;
pub mod vulnerability;

pub use compliance::{ComplianceChunk, Framework, ScoredChunk};
pub use policy::{
    ComparisonReport, CoverageReport, FrameworkCoverage, Grade, GroupCoverage, OrchestratorError,
    ParsedCounts, PolicyResult, RunResult, TextStats,
};
pub use progress::{noop_sink, Phase, Progress, ProgressSink, Status};
pub use severity::{Severity, SeverityInput};
pub use vulnerability::{
    Confidence, DastFinding, Exploitability, HttpMethod, Metadata, SastFinding, ScaFinding,
    VulnKind, Vulnerability,
};
