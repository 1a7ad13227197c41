//! The SAVING-phase collaborator. PDF/HTML/TXT rendering is out of scope;
//! this crate ships a JSON renderer as the reference implementation so the
//! orchestrator has a concrete collaborator to hand `RunResult` to.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use govscan_core::RunResult;

/// Consumes an immutable `RunResult` and decides on file names/formats.
/// Multiple renderers may run in parallel against the same run since the
/// input is immutable.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, result: &RunResult) -> Result<Vec<PathBuf>>;
}

pub struct JsonRenderer {
    output_dir: PathBuf,
}

impl JsonRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl Renderer for JsonRenderer {
    async fn render(&self, result: &RunResult) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("failed to create output dir: {}", self.output_dir.display()))?;

        let filename = format!("run-{}.json", result.timestamp.format("%Y%m%dT%H%M%S%3fZ"));
        let path: PathBuf = self.output_dir.join(filename);

        let body = serde_json::to_string_pretty(result).context("failed to serialise RunResult")?;
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("failed to write report: {}", path.display()))?;

        Ok(vec![path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govscan_core::{CoverageReport, Framework, FrameworkCoverage, ParsedCounts};

    fn empty_result() -> RunResult {
        RunResult {
            results: Vec::new(),
            parsed_counts: ParsedCounts { sast: 0, sca: 0, dast: 0 },
            coverage: CoverageReport {
                nist_csf: FrameworkCoverage::empty(108, &[]),
                iso_27001: FrameworkCoverage::empty(114, &[]),
                overall_score: 0.0,
            },
            timestamp: chrono::Utc::now(),
            comparison: None,
        }
    }

    #[tokio::test]
    async fn writes_one_json_file() {
        let tmp = tempfile::tempdir().unwrap();
        let renderer = JsonRenderer::new(tmp.path());
        let paths = renderer.render(&empty_result()).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].exists());
        let _ = Framework::NistCsf;
    }
}
